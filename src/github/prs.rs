//! Pull request listing, commit listing and creation via octocrab.

use chrono::{DateTime, Utc};
use octocrab::Octocrab;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::GitHubError;

const PER_PAGE: u8 = 100;
const MAX_PAGES: u32 = 50;

/// A merged pull request.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PullRequest {
    pub number: u64,
    pub title: String,
    pub merged_at: Option<DateTime<Utc>>,
    pub labels: Vec<String>,
}

impl PullRequest {
    pub fn has_label(&self, name: &str) -> bool {
        self.labels.iter().any(|l| l == name)
    }
}

/// A commit belonging to a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PullRequestCommit {
    pub sha: String,
    pub parent_count: usize,
}

impl PullRequestCommit {
    pub fn is_merge(&self) -> bool {
        self.parent_count > 1
    }
}

/// Request body for opening a pull request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewPullRequest {
    pub title: String,
    pub head: String,
    pub base: String,
    pub body: String,
}

/// A pull request the host accepted.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct CreatedPullRequest {
    pub number: u64,
    pub url: String,
}

#[derive(Debug, Deserialize)]
struct RawCommit {
    sha: String,
    #[serde(default)]
    parents: Vec<RawParent>,
}

#[derive(Debug, Deserialize)]
struct RawParent {
    #[allow(dead_code)]
    sha: String,
}

#[derive(Serialize)]
struct PageParams {
    per_page: u8,
    page: u32,
}

/// List pull requests merged into `base`, newest-created first.
///
/// Closed but unmerged pull requests and those merged outside
/// `[merged_after, merged_before]` are dropped; the API order is kept.
pub async fn list_merged_pulls_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    base: &str,
    merged_after: Option<DateTime<Utc>>,
    merged_before: Option<DateTime<Utc>>,
) -> Result<Vec<PullRequest>, GitHubError> {
    let mut merged = Vec::new();
    let mut page = 1u32;

    loop {
        let result = octocrab
            .pulls(owner, repo)
            .list()
            .state(octocrab::params::State::Closed)
            .base(base)
            .sort(octocrab::params::pulls::Sort::Created)
            .direction(octocrab::params::Direction::Descending)
            .per_page(PER_PAGE)
            .page(page)
            .send()
            .await;

        let prs_page = match result {
            Ok(page) => page,
            Err(e) => return Err(classify_error(e, owner, repo, GitHubError::FetchPRs)),
        };

        if prs_page.items.is_empty() {
            break;
        }
        let has_next = prs_page.next.is_some();

        for pr in prs_page.items {
            let Some(merged_at) = pr.merged_at else {
                continue;
            };
            if merged_after.is_some_and(|after| merged_at < after) {
                continue;
            }
            if merged_before.is_some_and(|before| merged_at > before) {
                continue;
            }

            let labels = pr
                .labels
                .unwrap_or_default()
                .into_iter()
                .map(|l| l.name)
                .collect();

            merged.push(PullRequest {
                number: pr.number,
                title: pr.title.unwrap_or_default(),
                merged_at: Some(merged_at),
                labels,
            });
        }

        if !has_next {
            break;
        }

        page += 1;
        if page > MAX_PAGES {
            warn!(
                "Reached {}-page safety limit while fetching PRs for {}/{}",
                MAX_PAGES, owner, repo
            );
            break;
        }
    }

    debug!(count = merged.len(), base, "Fetched merged pull requests");
    Ok(merged)
}

/// List the commits of pull request `number` in API order.
pub async fn list_pull_commits_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    number: u64,
) -> Result<Vec<PullRequestCommit>, GitHubError> {
    let route = format!("/repos/{owner}/{repo}/pulls/{number}/commits");
    let mut commits = Vec::new();
    let mut page = 1u32;

    loop {
        let params = PageParams {
            per_page: PER_PAGE,
            page,
        };
        let batch: Vec<RawCommit> = octocrab
            .get(&route, Some(&params))
            .await
            .map_err(|e| {
                classify_error(e, owner, repo, |source| GitHubError::FetchCommits { number, source })
            })?;

        let full_page = batch.len() == usize::from(PER_PAGE);
        commits.extend(batch.into_iter().map(|c| PullRequestCommit {
            sha: c.sha,
            parent_count: c.parents.len(),
        }));

        if !full_page || page >= MAX_PAGES {
            break;
        }
        page += 1;
    }

    Ok(commits)
}

/// Open a pull request from `request.head` into `request.base`.
pub async fn create_pull_request_with_client(
    octocrab: &Octocrab,
    owner: &str,
    repo: &str,
    request: &NewPullRequest,
) -> Result<CreatedPullRequest, GitHubError> {
    let pr = octocrab
        .pulls(owner, repo)
        .create(&request.title, &request.head, &request.base)
        .body(&request.body)
        .send()
        .await
        .map_err(|e| {
            classify_error(e, owner, repo, |source| GitHubError::CreatePullRequest {
                head: request.head.clone(),
                source,
            })
        })?;

    Ok(CreatedPullRequest {
        number: pr.number,
        url: pr.html_url.map(|u| u.to_string()).unwrap_or_default(),
    })
}

/// Map rate-limit and not-found responses to their own variants.
///
/// octocrab surfaces both as generic errors, so the rendered message is
/// inspected in its Display and Debug forms.
fn classify_error(
    e: octocrab::Error,
    owner: &str,
    repo: &str,
    otherwise: impl FnOnce(Box<octocrab::Error>) -> GitHubError,
) -> GitHubError {
    let display = e.to_string();
    let debug = format!("{:?}", e);

    if display.to_lowercase().contains("rate limit") || debug.to_lowercase().contains("rate limit") {
        return GitHubError::RateLimited {
            reset_time: "unknown".to_string(),
        };
    }
    if display.contains("Not Found") || debug.contains("Not Found") {
        return GitHubError::RepositoryNotFound {
            owner: owner.to_string(),
            repo: repo.to_string(),
        };
    }
    otherwise(Box::new(e))
}

/// Extract owner and repo from a git remote URL.
pub fn parse_github_remote(url: &str) -> Result<(String, String), GitHubError> {
    if let Some(path) = url.strip_prefix("git@github.com:") {
        return parse_owner_repo_path(path);
    }

    if let Some((_, path)) = url.split_once("github.com/") {
        return parse_owner_repo_path(path);
    }

    Err(GitHubError::InvalidRepositoryUrl)
}

/// Parse an `owner/repo` slug.
pub fn parse_repository_slug(slug: &str) -> Result<(String, String), GitHubError> {
    match slug.split_once('/') {
        Some((owner, repo)) if !owner.is_empty() && !repo.is_empty() && !repo.contains('/') => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GitHubError::InvalidRepositoryUrl),
    }
}

fn parse_owner_repo_path(path: &str) -> Result<(String, String), GitHubError> {
    let path = path.strip_suffix(".git").unwrap_or(path);
    let mut parts = path.split('/');

    match (parts.next(), parts.next()) {
        (Some(owner), Some(repo)) if !owner.is_empty() && !repo.is_empty() => {
            Ok((owner.to_string(), repo.to_string()))
        }
        _ => Err(GitHubError::InvalidRepositoryUrl),
    }
}
