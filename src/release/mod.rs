//! Release version bumping.
//!
//! A version with patch zero runs the major flow: the release branch is cut
//! from the main branch, then a second branch moves the main branch to the
//! upcoming devel version and schema. Any other version runs the patch flow
//! on the existing release branch, optionally cherry-picking backports.
//!
//! Steps run strictly in order and the first failure aborts the run. Files
//! already rewritten are left as they are.

pub mod backport;
pub mod context;
mod major;
mod patch;
pub mod plan;

use std::path::PathBuf;

use serde::Serialize;
use uuid::Uuid;

use crate::autoconf::Autoconf;
use crate::error::{GitHubError, ReleaseError};
use crate::git::VersionControl;
use crate::github::{CreatedPullRequest, RepositoryHost};
use crate::version::ReleaseKind;

pub use context::ReleaseContext;
pub use plan::ReleasePlan;

/// What a release run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleaseOutcome {
    pub kind: ReleaseKind,
    pub release_branch: String,
    /// Branch moving the main branch forward (major only).
    pub upcoming_version_branch: Option<String>,
    /// New empty upgrade script (major only).
    pub upgrade_sql_path: Option<PathBuf>,
    /// New empty downgrade script (major only).
    pub downgrade_sql_path: Option<PathBuf>,
    /// Branch carrying the patch release commit (patch only).
    pub pr_branch: Option<String>,
    /// Pull request opened against the main branch (major, outside test mode).
    pub pull_request: Option<CreatedPullRequest>,
    /// Commits cherry-picked onto the release branch.
    pub cherry_picked: Vec<String>,
}

/// Runs release flows against a source tree through its collaborators.
pub struct ReleaseBumper<'a> {
    vcs: &'a dyn VersionControl,
    autoconf: &'a dyn Autoconf,
    host: Option<&'a dyn RepositoryHost>,
}

impl<'a> ReleaseBumper<'a> {
    /// `host` may be omitted for runs that never reach GitHub: test-mode
    /// major releases and patch releases without cherry-picking.
    pub fn new(
        vcs: &'a dyn VersionControl,
        autoconf: &'a dyn Autoconf,
        host: Option<&'a dyn RepositoryHost>,
    ) -> Self {
        Self { vcs, autoconf, host }
    }

    /// Validate the context and run the flow its version calls for.
    pub fn bump(&self, context: &ReleaseContext) -> Result<ReleaseOutcome, ReleaseError> {
        context.validate()?;
        let plan = ReleasePlan::new(context, &Uuid::new_v4().to_string())?;
        self.bump_with_plan(context, &plan)
    }

    /// Run with precomputed names; [`bump`](Self::bump) generates them.
    pub fn bump_with_plan(
        &self,
        context: &ReleaseContext,
        plan: &ReleasePlan,
    ) -> Result<ReleaseOutcome, ReleaseError> {
        match plan.kind {
            ReleaseKind::Major => major::run(self, context, plan),
            ReleaseKind::Patch => patch::run(self, context, plan),
        }
    }

    fn host(&self) -> Result<&'a dyn RepositoryHost, GitHubError> {
        self.host.ok_or(GitHubError::AuthenticationFailed)
    }
}

/// Whether a run with this context talks to the repository host.
pub fn needs_repository_host(context: &ReleaseContext) -> bool {
    match context.kind() {
        ReleaseKind::Major => !context.is_test,
        ReleaseKind::Patch => context.cherry_pick,
    }
}
