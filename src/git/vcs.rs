//! Version-control operations used by the release flows.

use std::path::{Path, PathBuf};

use tracing::info;

use crate::error::CommandError;
use crate::process::run_tool;

/// Branch, commit and push operations on the working tree.
///
/// Every failure is fatal to the run; implementations never retry.
#[cfg_attr(test, mockall::automock)]
pub trait VersionControl {
    /// Switch to an existing branch.
    fn checkout(&self, branch: &str) -> Result<(), CommandError>;

    /// Create `name` from the current HEAD and switch to it.
    fn create_branch(&self, name: &str) -> Result<(), CommandError>;

    /// Pull the current branch from its upstream.
    fn pull(&self) -> Result<(), CommandError>;

    /// Stage a single path for the next commit.
    fn stage(&self, path: &Path) -> Result<(), CommandError>;

    /// Stage every change in the tree and commit it.
    fn commit_all(&self, message: &str) -> Result<(), CommandError>;

    /// Push `branch` to `origin`, setting it as upstream.
    fn push(&self, branch: &str) -> Result<(), CommandError>;

    /// Apply a single commit onto the current branch, recording its origin.
    fn cherry_pick(&self, sha: &str) -> Result<(), CommandError>;
}

/// [`VersionControl`] backed by the system `git` binary.
#[derive(Debug, Clone)]
pub struct SystemGit {
    workdir: PathBuf,
    remote: String,
}

impl SystemGit {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
            remote: "origin".to_string(),
        }
    }

    /// Use a remote other than `origin` for pushes.
    pub fn with_remote(mut self, remote: impl Into<String>) -> Self {
        self.remote = remote.into();
        self
    }

    fn git(&self, args: &[&str]) -> Result<String, CommandError> {
        run_tool("git", args, &self.workdir)
    }
}

impl VersionControl for SystemGit {
    fn checkout(&self, branch: &str) -> Result<(), CommandError> {
        info!("Checking out {}", branch);
        self.git(&["checkout", branch]).map(drop)
    }

    fn create_branch(&self, name: &str) -> Result<(), CommandError> {
        info!("Creating branch {}", name);
        self.git(&["checkout", "-b", name]).map(drop)
    }

    fn pull(&self) -> Result<(), CommandError> {
        self.git(&["pull"]).map(drop)
    }

    fn stage(&self, path: &Path) -> Result<(), CommandError> {
        let path = path.to_string_lossy();
        self.git(&["add", path.as_ref()]).map(drop)
    }

    fn commit_all(&self, message: &str) -> Result<(), CommandError> {
        info!("Committing: {}", message);
        self.git(&["add", "--all"])?;
        self.git(&["commit", "-m", message]).map(drop)
    }

    fn push(&self, branch: &str) -> Result<(), CommandError> {
        info!("Pushing {} to {}", branch, self.remote);
        self.git(&["push", "--set-upstream", &self.remote, branch])
            .map(drop)
    }

    fn cherry_pick(&self, sha: &str) -> Result<(), CommandError> {
        info!("Cherry-picking {}", sha);
        self.git(&["cherry-pick", "-x", sha]).map(drop)
    }
}
