//! Upgrade and downgrade migration scripts for a new schema version.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::ReleaseError;

use super::SourceTree;
use super::edit::{LinePattern, insert_before_required, write_file};

/// Line the downgrade test block is inserted in front of.
pub const DOWNGRADE_TEST_ANCHOR: &str = "DROP TABLE prev_objects, extension_diff;";

/// `<ext>--<current>--<upcoming>.sql`
pub fn upgrade_file_name(extension: &str, current_schema: &str, upcoming_schema: &str) -> String {
    format!("{extension}--{current_schema}--{upcoming_schema}.sql")
}

/// `<ext>--<upcoming>--<current>.sql`
pub fn downgrade_file_name(extension: &str, current_schema: &str, upcoming_schema: &str) -> String {
    format!("{extension}--{upcoming_schema}--{current_schema}.sql")
}

/// Create the empty upgrade script from `current_schema` to `upcoming_schema`.
pub fn create_upgrade_script(
    tree: &SourceTree,
    current_schema: &str,
    upcoming_schema: &str,
) -> Result<PathBuf, ReleaseError> {
    let ext = tree.extension();
    let content = format!(
        "-- {ext}--{current_schema}--{upcoming_schema}\n\n-- bump version to {upcoming_schema}\n\n"
    );
    let path = tree
        .sql_dir()
        .join(upgrade_file_name(ext, current_schema, upcoming_schema));
    create_script(&path, &content)?;
    Ok(path)
}

/// Create the matching downgrade script, which stays empty while the
/// upgrade script is.
pub fn create_downgrade_script(
    tree: &SourceTree,
    current_schema: &str,
    upcoming_schema: &str,
) -> Result<PathBuf, ReleaseError> {
    let ext = tree.extension();
    let content = format!(
        "-- {ext}--{upcoming_schema}--{current_schema}\n\
         -- this is an empty downgrade path since {} is empty for now\n",
        upgrade_file_name(ext, current_schema, upcoming_schema)
    );
    let path = tree
        .downgrades_dir()
        .join(downgrade_file_name(ext, current_schema, upcoming_schema));
    create_script(&path, &content)?;
    Ok(path)
}

/// Regression-test block that upgrades to the new schema, downgrades back,
/// checks nothing changed, then snapshots the new state.
///
/// With `with_results` the block carries the psql output expected after each
/// `print_extension_changes()` call, as the `.out` fixture needs.
pub fn downgrade_test_block(extension: &str, current_schema: &str, upcoming_schema: &str, with_results: bool) -> String {
    let empty_result = if with_results {
        " previous_object | current_object\n\
         ---------------------------------------------------------------------\n\
         (0 rows)\n"
    } else {
        ""
    };

    format!(
        "-- Test downgrade to {current_schema} from {upcoming_schema}\n\
         ALTER EXTENSION {extension} UPDATE TO '{upcoming_schema}';\n\
         ALTER EXTENSION {extension} UPDATE TO '{current_schema}';\n\
         -- Should be empty result since upgrade+downgrade should be a no-op\n\
         SELECT * FROM print_extension_changes();\n\
         {empty_result}\
         \n\
         -- Snapshot of state at {upcoming_schema}\n\
         ALTER EXTENSION {extension} UPDATE TO '{upcoming_schema}';\n\
         SELECT * FROM print_extension_changes();\n\
         {empty_result}\
         \n"
    )
}

/// Insert the downgrade test block into the upgrade-path SQL source and its
/// expected output.
pub fn add_downgrade_tests(tree: &SourceTree, current_schema: &str, upcoming_schema: &str) -> Result<(), ReleaseError> {
    let anchor = LinePattern::literal(DOWNGRADE_TEST_ANCHOR);
    let ext = tree.extension();

    for (path, with_results) in [(tree.multi_extension_sql(), false), (tree.multi_extension_out(), true)] {
        info!(
            "Adding downgrade tests from {} to {} in {}",
            upcoming_schema,
            current_schema,
            path.display()
        );
        let block = downgrade_test_block(ext, current_schema, upcoming_schema, with_results);
        insert_before_required(&path, &anchor, &block)?;
    }
    Ok(())
}

fn create_script(path: &Path, content: &str) -> Result<(), ReleaseError> {
    if let Some(dir) = path.parent() {
        std::fs::create_dir_all(dir).map_err(|e| ReleaseError::io(dir, e))?;
    }
    write_file(path, content)?;
    info!("Created {}", path.display());
    Ok(())
}
