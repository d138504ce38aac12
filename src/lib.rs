//! relprep - prepares release branches and version bumps for PostgreSQL extension projects.
//!
//! # Overview
//!
//! Given a target version, relprep rewrites the version strings spread over a
//! Citus source tree, regenerates `configure`, commits and pushes the result,
//! and for major releases opens a pull request moving the main branch to the
//! next devel version. Patch releases can cherry-pick backport-labelled pull
//! requests onto the release branch.

pub mod autoconf;
pub mod config;
pub mod error;
pub mod git;
pub mod github;
pub mod process;
pub mod project;
pub mod release;
pub mod tree;
pub mod version;

// Re-export commonly used types
pub use error::{CommandError, GitHubError, ReleaseError, ValidationError, VersionBumpError};
pub use project::{ProjectCatalog, ProjectProfile};
pub use release::{ReleaseBumper, ReleaseContext, ReleaseOutcome, ReleasePlan};
pub use version::{ReleaseKind, ReleaseVersion};
