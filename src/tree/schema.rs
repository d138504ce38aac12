//! Reading the schema version declared in the extension control file.

use std::path::Path;

use tracing::debug;

use crate::error::{ReleaseError, ValidationError};

use super::edit::read_file;

/// Read the `default_version = '<schema>'` value of a control file.
///
/// The first `default_version` line wins. A missing line, a line without
/// exactly one `=`, or an empty value is a validation error.
pub fn read_schema_version(control_path: &Path) -> Result<String, ReleaseError> {
    let content = read_file(control_path)?;

    let line = content
        .lines()
        .find(|line| line.trim_start().starts_with("default_version"))
        .ok_or_else(|| ValidationError::MissingSchemaVersion {
            path: control_path.to_path_buf(),
        })?;

    let malformed = || ValidationError::MalformedSchemaVersion {
        path: control_path.to_path_buf(),
        line: line.to_string(),
    };

    let parts: Vec<&str> = line.split('=').collect();
    let [_, value] = parts.as_slice() else {
        return Err(malformed().into());
    };

    let schema = value.trim_matches(|c: char| c == ' ' || c == '\'' || c == '\t');
    if schema.is_empty() {
        return Err(malformed().into());
    }

    debug!(path = %control_path.display(), schema, "Read current schema version");
    Ok(schema.to_string())
}
