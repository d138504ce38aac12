//! Running external tools (git, autoconf) as subprocesses.
//!
//! Tools inherit the user's environment, so git config, SSH agent and
//! credential helpers apply as they would in a shell.

use std::path::{Path, PathBuf};
use std::process::Command;

use tracing::debug;

use crate::error::CommandError;

/// Tools a release run shells out to.
pub const REQUIRED_TOOLS: &[&str] = &["git", "autoconf"];

/// Run `program args...` in `workdir` and return its trimmed stdout.
///
/// A non-zero exit is an error carrying the captured stderr.
pub fn run_tool(program: &str, args: &[&str], workdir: &Path) -> Result<String, CommandError> {
    let command = display_command(program, args);
    debug!(command = %command, workdir = %workdir.display(), "Running external command");

    let output = Command::new(program)
        .args(args)
        .current_dir(workdir)
        .output()
        .map_err(|source| CommandError::SpawnFailed {
            command: command.clone(),
            source,
        })?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr).trim().to_string();
        return Err(CommandError::NonZeroExit {
            command,
            code: output.status.code(),
            stderr,
        });
    }

    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Resolve `program` on `PATH`.
pub fn ensure_installed(program: &str) -> Result<PathBuf, CommandError> {
    which::which(program).map_err(|_| CommandError::NotInstalled(program.to_string()))
}

/// Check that every tool in [`REQUIRED_TOOLS`] is installed.
pub fn check_required_tools() -> Result<(), CommandError> {
    for tool in REQUIRED_TOOLS {
        let path = ensure_installed(tool)?;
        debug!(tool, path = %path.display(), "Found required tool");
    }
    Ok(())
}

fn display_command(program: &str, args: &[&str]) -> String {
    std::iter::once(program)
        .chain(args.iter().copied())
        .collect::<Vec<_>>()
        .join(" ")
}
