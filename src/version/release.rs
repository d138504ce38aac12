//! Three-component release versions and the values derived from them.

use std::fmt;
use std::str::FromStr;

use regex_lite::Regex;
use semver::Version;
use serde::Serialize;

use crate::error::ValidationError;

const VERSION_SHAPE: &str = r"^(\d+)\.(\d+)\.(\d+)$";

/// Whether a release starts a new minor line or patches an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ReleaseKind {
    Major,
    Patch,
}

impl fmt::Display for ReleaseKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReleaseKind::Major => write!(f, "major"),
            ReleaseKind::Patch => write!(f, "patch"),
        }
    }
}

/// A `major.minor.patch` version with no pre-release or build metadata.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ReleaseVersion(Version);

impl ReleaseVersion {
    pub fn new(major: u64, minor: u64, patch: u64) -> Self {
        Self(Version::new(major, minor, patch))
    }

    /// Parse a dotted three-component version such as `10.2.1`.
    ///
    /// Components are plain digit runs, so `10.02.0` reads as `10.2.0`.
    pub fn parse(input: &str) -> Result<Self, ValidationError> {
        let invalid = || ValidationError::InvalidVersion(input.to_string());

        let captures = Regex::new(VERSION_SHAPE)
            .ok()
            .and_then(|re| re.captures(input).map(|c| [c[1].to_string(), c[2].to_string(), c[3].to_string()]))
            .ok_or_else(invalid)?;

        let mut components = [0u64; 3];
        for (slot, digits) in components.iter_mut().zip(&captures) {
            *slot = digits
                .parse()
                .map_err(|e| ValidationError::ParseFailed(input.to_string(), e))?;
        }
        let [major, minor, patch] = components;

        Ok(Self::new(major, minor, patch))
    }

    pub fn major(&self) -> u64 {
        self.0.major
    }

    pub fn minor(&self) -> u64 {
        self.0.minor
    }

    pub fn patch(&self) -> u64 {
        self.0.patch
    }

    /// Patch zero starts a new release line.
    pub fn kind(&self) -> ReleaseKind {
        if self.0.patch == 0 {
            ReleaseKind::Major
        } else {
            ReleaseKind::Patch
        }
    }

    /// The version one patch above this one.
    pub fn next_patch(&self) -> Result<Self, ValidationError> {
        let patch = self
            .0
            .patch
            .checked_add(1)
            .ok_or_else(|| ValidationError::InvalidVersion(self.to_string()))?;
        Ok(Self::new(self.0.major, self.0.minor, patch))
    }

    /// `major.minor`, e.g. `10.2` for `10.2.1`.
    pub fn minor_version(&self) -> String {
        format!("{}.{}", self.0.major, self.0.minor)
    }

    /// `release-major.minor`, with a `-test` suffix for test runs.
    pub fn release_branch_name(&self, is_test: bool) -> String {
        let name = format!("release-{}", self.minor_version());
        if is_test { format!("{name}-test") } else { name }
    }
}

impl fmt::Display for ReleaseVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for ReleaseVersion {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for ReleaseVersion {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}
