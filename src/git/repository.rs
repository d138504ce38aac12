//! Read-only repository introspection using git2-rs.

use std::path::Path;

use git2::Repository;
use tracing::debug;

use crate::error::CommandError;

/// Open the repository containing `path`.
pub fn open(path: &Path) -> Result<Repository, CommandError> {
    Repository::discover(path).map_err(CommandError::OpenRepository)
}

/// Name of the checked-out branch, or `None` on a detached or unborn HEAD.
pub fn current_branch(repo: &Repository) -> Option<String> {
    let head = repo.head().ok()?;
    if !head.is_branch() {
        return None;
    }
    head.shorthand().map(String::from)
}

/// URL of the named remote, if one is configured.
pub fn remote_url(repo: &Repository, name: &str) -> Option<String> {
    let remote = repo.find_remote(name).ok()?;
    let url = remote.url().map(String::from);
    debug!(remote = name, url = ?url, "Resolved remote");
    url
}

/// Whether a local branch with this name exists.
pub fn branch_exists(repo: &Repository, name: &str) -> bool {
    repo.find_branch(name, git2::BranchType::Local).is_ok()
}
