//! The checked-out extension source tree and the edits a release makes to it.

pub mod edit;
pub mod migration;
pub mod schema;
pub mod targets;

use std::path::{Path, PathBuf};

pub use edit::{LinePattern, VersionEdit, insert_before_lines, replace_lines};
pub use schema::read_schema_version;

const CONFIGURE_IN: &str = "configure.in";
const CONFIG_PY: &str = "src/test/regress/upgrade/config.py";
const DISTRIBUTED_DIR: &str = "src/backend/distributed";
const MULTI_EXTENSION_SQL: &str = "src/test/regress/sql/multi_extension.sql";
const MULTI_EXTENSION_OUT: &str = "src/test/regress/expected/multi_extension.out";
const SQL_DIR: &str = "src/backend/distributed/sql";
const DOWNGRADES_DIR: &str = "src/backend/distributed/sql/downgrades";

/// Paths of the files a release touches, rooted at the execution path.
#[derive(Debug, Clone)]
pub struct SourceTree {
    root: PathBuf,
    extension: String,
}

impl SourceTree {
    pub fn new(root: impl Into<PathBuf>, extension: &str) -> Self {
        Self {
            root: root.into(),
            extension: extension.to_string(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn extension(&self) -> &str {
        &self.extension
    }

    pub fn configure_in(&self) -> PathBuf {
        self.root.join(CONFIGURE_IN)
    }

    pub fn config_py(&self) -> PathBuf {
        self.root.join(CONFIG_PY)
    }

    pub fn control_file(&self) -> PathBuf {
        self.root
            .join(DISTRIBUTED_DIR)
            .join(format!("{}.control", self.extension))
    }

    pub fn multi_extension_sql(&self) -> PathBuf {
        self.root.join(MULTI_EXTENSION_SQL)
    }

    pub fn multi_extension_out(&self) -> PathBuf {
        self.root.join(MULTI_EXTENSION_OUT)
    }

    pub fn sql_dir(&self) -> PathBuf {
        self.root.join(SQL_DIR)
    }

    pub fn downgrades_dir(&self) -> PathBuf {
        self.root.join(DOWNGRADES_DIR)
    }
}
