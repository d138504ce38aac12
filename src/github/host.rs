//! Blocking repository-hosting interface over the async GitHub client.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use tokio::runtime::Runtime;
use tracing::info;

use crate::error::GitHubError;

use super::prs::{
    CreatedPullRequest, NewPullRequest, PullRequest, PullRequestCommit,
    create_pull_request_with_client, list_merged_pulls_with_client, list_pull_commits_with_client,
};

/// Pull request queries and creation against one hosted repository.
#[cfg_attr(test, mockall::automock)]
pub trait RepositoryHost {
    /// Pull requests merged into `base` within the optional window, in the
    /// order the host returns them.
    fn list_merged_pull_requests(
        &self,
        base: &str,
        merged_after: Option<DateTime<Utc>>,
        merged_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<PullRequest>, GitHubError>;

    fn list_pull_request_commits(&self, number: u64) -> Result<Vec<PullRequestCommit>, GitHubError>;

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<CreatedPullRequest, GitHubError>;
}

/// GitHub-backed [`RepositoryHost`] driving octocrab on a private
/// current-thread runtime.
pub struct GitHubHost {
    runtime: Runtime,
    client: Octocrab,
    owner: String,
    repo: String,
}

impl GitHubHost {
    /// Build an authenticated client for `owner/repo`.
    pub fn connect(token: &str, owner: &str, repo: &str) -> Result<Self, GitHubError> {
        let runtime = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .map_err(GitHubError::Runtime)?;

        let client = {
            let _guard = runtime.enter();
            Octocrab::builder()
                .personal_token(token.to_string())
                .build()
                .map_err(|e| GitHubError::Client(Box::new(e)))?
        };

        Ok(Self {
            runtime,
            client,
            owner: owner.to_string(),
            repo: repo.to_string(),
        })
    }

    pub fn repository(&self) -> String {
        format!("{}/{}", self.owner, self.repo)
    }
}

impl RepositoryHost for GitHubHost {
    fn list_merged_pull_requests(
        &self,
        base: &str,
        merged_after: Option<DateTime<Utc>>,
        merged_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        info!("Fetching pull requests merged into {} on {}", base, self.repository());
        self.runtime.block_on(list_merged_pulls_with_client(
            &self.client,
            &self.owner,
            &self.repo,
            base,
            merged_after,
            merged_before,
        ))
    }

    fn list_pull_request_commits(&self, number: u64) -> Result<Vec<PullRequestCommit>, GitHubError> {
        self.runtime.block_on(list_pull_commits_with_client(
            &self.client,
            &self.owner,
            &self.repo,
            number,
        ))
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<CreatedPullRequest, GitHubError> {
        info!(
            "Opening pull request {} -> {} on {}",
            request.head,
            request.base,
            self.repository()
        );
        self.runtime.block_on(create_pull_request_with_client(
            &self.client,
            &self.owner,
            &self.repo,
            request,
        ))
    }
}
