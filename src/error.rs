//! Error types for relprep modules using thiserror.

use std::path::PathBuf;

use thiserror::Error;

/// Top-level error returned by a release run.
///
/// Every variant aborts the run; nothing is retried and edits already written
/// to disk stay there.
#[derive(Error, Debug)]
pub enum ReleaseError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error(transparent)]
    VersionBump(#[from] VersionBumpError),

    #[error(transparent)]
    Command(#[from] CommandError),

    #[error(transparent)]
    GitHub(#[from] GitHubError),

    #[error("Invalid line pattern: {0}")]
    Pattern(#[from] regex_lite::Error),

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ReleaseError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        ReleaseError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Input that does not have the shape a release needs.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error(
        "Invalid version '{0}': expected three numeric components separated with dots, e.g. 10.0.1"
    )]
    InvalidVersion(String),

    #[error("Failed to parse version '{0}': {1}")]
    ParseFailed(String, #[source] std::num::ParseIntError),

    #[error("Version info could not be found in {}", path.display())]
    MissingSchemaVersion { path: PathBuf },

    #[error("{} already declares schema version {schema}; this release was already bumped", path.display())]
    SchemaAlreadyCurrent { path: PathBuf, schema: String },

    #[error("Malformed schema version declaration in {}: '{line}'", path.display())]
    MalformedSchemaVersion { path: PathBuf, line: String },

    #[error("Unknown project '{name}'. Known projects: {known}")]
    UnknownProject { name: String, known: String },

    #[error("Invalid date '{0}': expected YYYY.MM.DD")]
    InvalidDate(String),

    #[error("Invalid {name} value '{value}': {reason}")]
    InvalidOverride {
        name: String,
        value: String,
        reason: String,
    },

    #[error("{0}")]
    InvalidOptions(String),
}

/// A line the release flow must rewrite was not present in its file.
#[derive(Error, Debug)]
#[error("{} does not contain a line matching '{pattern}'", path.display())]
pub struct VersionBumpError {
    pub path: PathBuf,
    pub pattern: String,
}

/// Errors from external tools (git, autoconf).
#[derive(Error, Debug)]
pub enum CommandError {
    #[error("{0} not found in PATH")]
    NotInstalled(String),

    #[error("Failed to run {command}: {source}")]
    SpawnFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    #[error("{command} failed with {}: {stderr}",
            code.map_or("unknown status".to_string(), |c| format!("exit code {c}")))]
    NonZeroExit {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("Failed to open repository: {0}")]
    OpenRepository(#[source] git2::Error),
}

/// Errors from GitHub API operations.
#[derive(Error, Debug)]
pub enum GitHubError {
    #[error(
        "GitHub authentication failed: no valid auth found. Run 'gh auth login' or set GITHUB_TOKEN environment variable"
    )]
    AuthenticationFailed,

    #[error("Failed to build GitHub client: {0}")]
    Client(#[source] Box<octocrab::Error>),

    #[error("Failed to start async runtime for GitHub calls: {0}")]
    Runtime(#[source] std::io::Error),

    #[error("Failed to fetch PRs: {0}")]
    FetchPRs(#[source] Box<octocrab::Error>),

    #[error("Failed to fetch commits of PR #{number}: {source}")]
    FetchCommits {
        number: u64,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Failed to create pull request from {head}: {source}")]
    CreatePullRequest {
        head: String,
        #[source]
        source: Box<octocrab::Error>,
    },

    #[error("Rate limited by GitHub API. Resets at: {reset_time}")]
    RateLimited { reset_time: String },

    #[error("Repository not found: {owner}/{repo}")]
    RepositoryNotFound { owner: String, repo: String },

    #[error("Failed to parse repository URL")]
    InvalidRepositoryUrl,
}
