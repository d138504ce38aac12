//! Git operations: mutations through the git binary, introspection through git2-rs.

pub mod repository;
pub mod vcs;

pub use vcs::{SystemGit, VersionControl};
