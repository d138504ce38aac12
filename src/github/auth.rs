//! GitHub token discovery.
//!
//! Sources, first non-empty wins: `gh auth token`, `GITHUB_TOKEN`, `GH_TOKEN`.

use std::env;
use std::process::Command;

use tracing::debug;

use crate::error::GitHubError;

pub const TOKEN_ENV_VARS: [&str; 2] = ["GITHUB_TOKEN", "GH_TOKEN"];

/// Find a GitHub token for API calls.
pub fn get_github_token() -> Result<String, GitHubError> {
    if let Some(token) = token_from_gh_cli() {
        debug!("Using GitHub token from gh CLI");
        return Ok(token);
    }

    token_from_env().ok_or(GitHubError::AuthenticationFailed)
}

/// First non-empty token among [`TOKEN_ENV_VARS`].
pub fn token_from_env() -> Option<String> {
    TOKEN_ENV_VARS.iter().find_map(|name| {
        let token = env::var(name).ok()?;
        let token = token.trim();
        if token.is_empty() {
            None
        } else {
            debug!("Using GitHub token from {}", name);
            Some(token.to_string())
        }
    })
}

fn token_from_gh_cli() -> Option<String> {
    let output = Command::new("gh").args(["auth", "token"]).output().ok()?;
    if !output.status.success() {
        return None;
    }

    let token = String::from_utf8_lossy(&output.stdout).trim().to_string();
    (!token.is_empty()).then_some(token)
}
