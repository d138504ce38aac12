//! Names and versions derived once from a [`ReleaseContext`].

use serde::Serialize;

use crate::error::ValidationError;
use crate::version::{ReleaseKind, ReleaseVersion};

use super::ReleaseContext;

/// Values every step of a run agrees on.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReleasePlan {
    pub kind: ReleaseKind,
    pub upcoming_version: ReleaseVersion,
    /// `major.minor` of the upcoming version.
    pub upcoming_minor_version: String,
    /// `<upcoming minor>devel`
    pub devel_version: String,
    /// `<upcoming minor>-1`, the schema the main branch moves to.
    pub upcoming_schema_version: String,
    pub release_branch: String,
    pub upcoming_version_branch: String,
    /// Source branch pushed for a patch release's pull request.
    pub patch_pr_branch: String,
    pub commit_message: String,
}

impl ReleasePlan {
    /// `unique_id` keeps generated branch names from colliding across runs.
    ///
    /// Fails when the version has no next patch to move to.
    pub fn new(context: &ReleaseContext, unique_id: &str) -> Result<Self, ValidationError> {
        let upcoming_version = match &context.upcoming_version {
            Some(version) => version.clone(),
            None => context.version.next_patch()?,
        };
        let upcoming_minor_version = upcoming_version.minor_version();
        let release_branch = context.version.release_branch_name(context.is_test);

        Ok(Self {
            kind: context.kind(),
            devel_version: format!("{upcoming_minor_version}devel"),
            upcoming_schema_version: format!("{upcoming_minor_version}-1"),
            upcoming_version_branch: format!("master-update-version-{unique_id}"),
            patch_pr_branch: format!("{release_branch}_{unique_id}"),
            commit_message: format!("Bump {} version to {}", context.project.name, context.version),
            upcoming_version,
            upcoming_minor_version,
            release_branch,
        })
    }

    /// Title of the pull request moving the main branch forward.
    pub fn upcoming_pr_title(&self, project: &str) -> String {
        format!("Bump {} to {}", project, self.upcoming_version)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::project::ProjectProfile;
    use std::path::PathBuf;

    fn context(version: &str, is_test: bool) -> ReleaseContext {
        ReleaseContext {
            project: ProjectProfile::new("citus", "Citus", "citus", "master", "citusdata"),
            version: ReleaseVersion::parse(version).unwrap(),
            main_branch: "master".into(),
            exec_path: PathBuf::from("/work"),
            is_test,
            cherry_pick: false,
            earliest_pr_date: None,
            upcoming_version: None,
            schema_version: None,
        }
    }

    #[test]
    fn test_major_release_plan() {
        let plan = ReleasePlan::new(&context("10.2.0", false), "abc").unwrap();

        assert_eq!(plan.kind, ReleaseKind::Major);
        assert_eq!(plan.upcoming_version, ReleaseVersion::new(10, 2, 1));
        assert_eq!(plan.upcoming_minor_version, "10.2");
        assert_eq!(plan.devel_version, "10.2devel");
        assert_eq!(plan.upcoming_schema_version, "10.2-1");
        assert_eq!(plan.release_branch, "release-10.2");
        assert_eq!(plan.upcoming_version_branch, "master-update-version-abc");
        assert_eq!(plan.commit_message, "Bump citus version to 10.2.0");
        assert_eq!(plan.upcoming_pr_title("citus"), "Bump citus to 10.2.1");
    }

    #[test]
    fn test_test_mode_suffixes_release_branch() {
        let plan = ReleasePlan::new(&context("10.2.3", true), "abc").unwrap();
        assert_eq!(plan.kind, ReleaseKind::Patch);
        assert_eq!(plan.release_branch, "release-10.2-test");
        assert_eq!(plan.patch_pr_branch, "release-10.2-test_abc");
    }

    #[test]
    fn test_upcoming_version_override() {
        let mut ctx = context("10.2.0", false);
        ctx.upcoming_version = Some(ReleaseVersion::new(11, 0, 0));

        let plan = ReleasePlan::new(&ctx, "abc").unwrap();

        assert_eq!(plan.upcoming_minor_version, "11.0");
        assert_eq!(plan.devel_version, "11.0devel");
        assert_eq!(plan.upcoming_schema_version, "11.0-1");
        assert_eq!(plan.release_branch, "release-10.2");
    }

    #[test]
    fn test_patch_at_max_has_no_upcoming_version() {
        let ctx = context("1.2.18446744073709551615", false);

        let err = ReleasePlan::new(&ctx, "abc").unwrap_err();

        assert!(matches!(err, ValidationError::InvalidVersion(v) if v == "1.2.18446744073709551615"));
    }

    #[test]
    fn test_override_skips_next_patch() {
        let mut ctx = context("1.2.18446744073709551615", false);
        ctx.upcoming_version = Some(ReleaseVersion::new(1, 3, 0));

        let plan = ReleasePlan::new(&ctx, "abc").unwrap();

        assert_eq!(plan.devel_version, "1.3devel");
    }
}
