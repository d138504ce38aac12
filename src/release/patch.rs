//! Patch release on an existing release branch.

use tracing::info;

use crate::error::ReleaseError;
use crate::tree::targets;

use super::backport::{cherry_pick_pull_requests, select_backports};
use super::{ReleaseBumper, ReleaseContext, ReleaseOutcome, ReleasePlan};

pub(super) fn run(
    bumper: &ReleaseBumper<'_>,
    context: &ReleaseContext,
    plan: &ReleasePlan,
) -> Result<ReleaseOutcome, ReleaseError> {
    let tree = context.source_tree();
    let vcs = bumper.vcs;
    let version = context.version.to_string();

    info!("{} is a patch release on {}", context.version, plan.release_branch);

    vcs.checkout(&plan.release_branch)?;
    if !context.is_test {
        vcs.pull()?;
    }

    // Release version strings
    targets::configure_version(&tree, &context.project, &version)?.apply()?;
    bumper.autoconf.regenerate()?;
    targets::fixture_release_marker(&tree, &context.version)?.apply()?;

    if let Some(schema) = &context.schema_version {
        info!("Setting schema version to {}", schema);
        targets::control_default_version(&tree, schema)?.apply()?;
    }

    // Backports land on the edited tree, ahead of the bump commit
    let cherry_picked = if context.cherry_pick {
        let host = bumper.host()?;
        let backports = select_backports(host, &context.main_branch, context.earliest_pr_date)?;
        cherry_pick_pull_requests(vcs, host, &backports)?
    } else {
        Vec::new()
    };

    vcs.commit_all(&plan.commit_message)?;

    // Pushed under a unique name for review
    vcs.create_branch(&plan.patch_pr_branch)?;
    if context.is_test {
        info!("Test mode: not pushing {}", plan.patch_pr_branch);
    } else {
        vcs.push(&plan.patch_pr_branch)?;
    }

    Ok(ReleaseOutcome {
        kind: plan.kind,
        release_branch: plan.release_branch.clone(),
        upcoming_version_branch: None,
        upgrade_sql_path: None,
        downgrade_sql_path: None,
        pr_branch: Some(plan.patch_pr_branch.clone()),
        pull_request: None,
        cherry_picked,
    })
}
