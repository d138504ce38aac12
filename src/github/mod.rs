//! GitHub API operations using octocrab.

pub mod auth;
pub mod host;
pub mod prs;

pub use auth::get_github_token;
pub use host::{GitHubHost, RepositoryHost};
pub use prs::{
    CreatedPullRequest, NewPullRequest, PullRequest, PullRequestCommit, create_pull_request_with_client,
    list_merged_pulls_with_client, list_pull_commits_with_client, parse_github_remote, parse_repository_slug,
};
