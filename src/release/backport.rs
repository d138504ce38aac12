//! Cherry-picking backport-labelled pull requests onto a release branch.

use chrono::{DateTime, Utc};
use tracing::{debug, info};

use crate::error::ReleaseError;
use crate::git::VersionControl;
use crate::github::{PullRequest, RepositoryHost};

pub const BACKPORT_LABEL: &str = "backport";

/// Pull requests merged into `base` since `earliest` that carry the backport
/// label, in host order.
pub fn select_backports(
    host: &dyn RepositoryHost,
    base: &str,
    earliest: Option<DateTime<Utc>>,
) -> Result<Vec<PullRequest>, ReleaseError> {
    let merged = host.list_merged_pull_requests(base, earliest, None)?;
    let total = merged.len();
    let backports: Vec<PullRequest> = merged
        .into_iter()
        .filter(|pr| pr.has_label(BACKPORT_LABEL))
        .collect();

    info!(
        "{} of {} merged PRs carry the {} label",
        backports.len(),
        total,
        BACKPORT_LABEL
    );
    for pr in &backports {
        info!("  #{} {}", pr.number, pr.title);
    }
    Ok(backports)
}

/// Cherry-pick every non-merge commit of each pull request, pull requests in
/// the given order and commits in the order the host lists them.
///
/// Returns the picked commit SHAs.
pub fn cherry_pick_pull_requests(
    vcs: &dyn VersionControl,
    host: &dyn RepositoryHost,
    pull_requests: &[PullRequest],
) -> Result<Vec<String>, ReleaseError> {
    let mut picked = Vec::new();

    for pr in pull_requests {
        let commits = host.list_pull_request_commits(pr.number)?;
        debug!(number = pr.number, commits = commits.len(), "Fetched PR commits");

        for commit in commits {
            if commit.is_merge() {
                debug!(sha = %commit.sha, "Skipping merge commit");
                continue;
            }
            vcs.cherry_pick(&commit.sha)?;
            picked.push(commit.sha);
        }
    }

    Ok(picked)
}
