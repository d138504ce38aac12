//! Regeneration of the `configure` script.

use std::path::PathBuf;

use tracing::info;

use crate::error::CommandError;
use crate::process::run_tool;

/// Regenerates `configure` from `configure.in`.
#[cfg_attr(test, mockall::automock)]
pub trait Autoconf {
    fn regenerate(&self) -> Result<(), CommandError>;
}

/// Runs `autoconf -f` in the source tree root.
#[derive(Debug, Clone)]
pub struct SystemAutoconf {
    workdir: PathBuf,
}

impl SystemAutoconf {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }
}

impl Autoconf for SystemAutoconf {
    fn regenerate(&self) -> Result<(), CommandError> {
        info!("Regenerating configure with autoconf");
        run_tool("autoconf", &["-f"], &self.workdir).map(drop)
    }
}
