//! Environment overrides and input parsing for release runs.

use std::env;

use chrono::{DateTime, NaiveDate, Utc};

use crate::error::ValidationError;
use crate::version::ReleaseVersion;

/// Overrides the version the main branch moves to after a release.
pub const UPCOMING_VERSION_ENV: &str = "UPCOMING_VERSION";

/// Format of `--earliest-pr-date`.
pub const PR_DATE_FORMAT: &str = "%Y.%m.%d";

/// Read the upcoming-version override, if set and non-empty.
pub fn upcoming_version_override() -> Result<Option<ReleaseVersion>, ValidationError> {
    let Ok(raw) = env::var(UPCOMING_VERSION_ENV) else {
        return Ok(None);
    };
    let raw = raw.trim();
    if raw.is_empty() {
        return Ok(None);
    }

    ReleaseVersion::parse(raw)
        .map(Some)
        .map_err(|e| ValidationError::InvalidOverride {
            name: UPCOMING_VERSION_ENV.to_string(),
            value: raw.to_string(),
            reason: e.to_string(),
        })
}

/// Parse a `YYYY.MM.DD` date as midnight UTC.
pub fn parse_pr_date(input: &str) -> Result<DateTime<Utc>, ValidationError> {
    let date = NaiveDate::parse_from_str(input.trim(), PR_DATE_FORMAT)
        .map_err(|_| ValidationError::InvalidDate(input.to_string()))?;
    let midnight = date
        .and_hms_opt(0, 0, 0)
        .ok_or_else(|| ValidationError::InvalidDate(input.to_string()))?;
    Ok(midnight.and_utc())
}
