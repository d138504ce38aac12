//! The individual line edits a release applies to the source tree.

use regex_lite::escape;

use crate::error::ReleaseError;
use crate::project::ProjectProfile;
use crate::version::ReleaseVersion;

use super::SourceTree;
use super::edit::{LinePattern, VersionEdit};

const DETAIL_PREFIX: &str = "DETAIL:  Loaded library requires ";
const DETAIL_SPECIFIED_SUFFIX: &str = ", but 8.0-1 was specified.";
const DETAIL_INSTALLED_SUFFIX: &str = ", but the installed extension version is 8.1-1.";

/// `AC_INIT([<display>], [<version>])` in `configure.in`.
pub fn configure_version(
    tree: &SourceTree,
    project: &ProjectProfile,
    version: &str,
) -> Result<VersionEdit, ReleaseError> {
    Ok(VersionEdit::new(
        tree.configure_in(),
        LinePattern::anchored(r"AC_INIT\(")?,
        format!("AC_INIT([{}], [{}])", project.display_name, version),
    ))
}

/// `MASTER_VERSION = '<minor>'` in the upgrade test tooling.
pub fn build_tooling_version(tree: &SourceTree, minor_version: &str) -> Result<VersionEdit, ReleaseError> {
    Ok(VersionEdit::new(
        tree.config_py(),
        LinePattern::anchored(r"MASTER_VERSION = '\d+\.\d+'")?,
        format!("MASTER_VERSION = '{minor_version}'"),
    ))
}

/// The `X.Ydevel` version row of the expected-output fixture.
pub fn fixture_devel_marker(tree: &SourceTree, version: &str) -> Result<VersionEdit, ReleaseError> {
    Ok(VersionEdit::new(
        tree.multi_extension_out(),
        LinePattern::anchored(r"\d+\.\d+devel$")?,
        format!(" {version}"),
    ))
}

/// The version row of the fixture on a release branch: either a previous
/// patch of the same minor line or the devel marker it was cut with.
pub fn fixture_release_marker(tree: &SourceTree, version: &ReleaseVersion) -> Result<VersionEdit, ReleaseError> {
    let minor = escape(&version.minor_version());
    Ok(VersionEdit::new(
        tree.multi_extension_out(),
        LinePattern::anchored(&format!(r"{minor}(\.\d+|devel)$"))?,
        format!(" {version}"),
    ))
}

/// The two `DETAIL:` lines that quote the loaded library's minor version.
pub fn fixture_detail_lines(tree: &SourceTree, minor_version: &str) -> Result<Vec<VersionEdit>, ReleaseError> {
    [DETAIL_SPECIFIED_SUFFIX, DETAIL_INSTALLED_SUFFIX]
        .into_iter()
        .map(|suffix| {
            let expr = format!(r"{}\d+\.\d+{}$", escape(DETAIL_PREFIX), escape(suffix));
            Ok(VersionEdit::new(
                tree.multi_extension_out(),
                LinePattern::anchored(&expr)?,
                format!("{DETAIL_PREFIX}{minor_version}{suffix}"),
            ))
        })
        .collect()
}

/// `ALTER EXTENSION <ext> UPDATE TO '<current>'` in the upgrade-path SQL
/// source and its expected output.
pub fn upgrade_statements(
    tree: &SourceTree,
    current_schema: &str,
    upcoming_schema: &str,
) -> Result<Vec<VersionEdit>, ReleaseError> {
    let ext = tree.extension();
    let expr = format!(
        "{}'{}'",
        escape(&format!("ALTER EXTENSION {ext} UPDATE TO ")),
        escape(current_schema)
    );
    let replacement = format!("ALTER EXTENSION {ext} UPDATE TO '{upcoming_schema}';");

    [tree.multi_extension_sql(), tree.multi_extension_out()]
        .into_iter()
        .map(|path| Ok(VersionEdit::new(path, LinePattern::anchored(&expr)?, replacement.clone())))
        .collect()
}

/// `default_version = '<schema>'` in the extension control file.
pub fn control_default_version(tree: &SourceTree, schema_version: &str) -> Result<VersionEdit, ReleaseError> {
    Ok(VersionEdit::new(
        tree.control_file(),
        LinePattern::anchored("default_version")?,
        format!("default_version = '{schema_version}'"),
    ))
}
