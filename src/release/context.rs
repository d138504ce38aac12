//! Inputs of one release run.

use std::path::PathBuf;

use chrono::{DateTime, Utc};

use crate::error::ValidationError;
use crate::project::ProjectProfile;
use crate::tree::SourceTree;
use crate::version::{ReleaseKind, ReleaseVersion};

/// Everything a release run needs to know, fixed before the run starts.
#[derive(Debug, Clone)]
pub struct ReleaseContext {
    pub project: ProjectProfile,
    pub version: ReleaseVersion,
    pub main_branch: String,
    pub exec_path: PathBuf,
    /// Suppresses pushes and pull requests and suffixes the release branch.
    pub is_test: bool,
    /// Cherry-pick backport-labelled pull requests (patch releases only).
    pub cherry_pick: bool,
    /// Only pull requests merged at or after this instant are backported.
    pub earliest_pr_date: Option<DateTime<Utc>>,
    /// Replaces the default next-patch upcoming version.
    pub upcoming_version: Option<ReleaseVersion>,
    /// Schema version written to the control file on a patch release.
    pub schema_version: Option<String>,
}

impl ReleaseContext {
    pub fn kind(&self) -> ReleaseKind {
        self.version.kind()
    }

    pub fn source_tree(&self) -> SourceTree {
        SourceTree::new(&self.exec_path, &self.project.extension)
    }

    /// Reject option combinations that do not apply to this release kind.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let invalid = |msg: &str| Err(ValidationError::InvalidOptions(msg.to_string()));

        match self.kind() {
            ReleaseKind::Major => {
                if self.cherry_pick {
                    return invalid("cherry-pick can only be enabled for patch releases");
                }
                if self.earliest_pr_date.is_some() {
                    return invalid("earliest PR date cannot be used for major releases");
                }
                if self.schema_version.is_some() {
                    return invalid("schema version cannot be set for major releases");
                }
            }
            ReleaseKind::Patch => {
                if self.cherry_pick && self.earliest_pr_date.is_none() {
                    return invalid("earliest PR date is required when cherry-pick is enabled");
                }
                if self.schema_version.as_deref().is_some_and(|s| s.trim().is_empty()) {
                    return invalid("schema version cannot be empty");
                }
            }
        }
        Ok(())
    }
}
