//! Major release: cut the release branch, then move the main branch forward.

use tracing::info;

use crate::error::{ReleaseError, ValidationError};
use crate::github::NewPullRequest;
use crate::tree::{migration, read_schema_version, targets};

use super::{ReleaseBumper, ReleaseContext, ReleaseOutcome, ReleasePlan};

pub(super) fn run(
    bumper: &ReleaseBumper<'_>,
    context: &ReleaseContext,
    plan: &ReleasePlan,
) -> Result<ReleaseOutcome, ReleaseError> {
    let tree = context.source_tree();
    let vcs = bumper.vcs;

    info!("{} is a major release, cutting {}", context.version, plan.release_branch);

    // Cut the release branch from an up-to-date main branch
    vcs.checkout(&context.main_branch)?;
    if !context.is_test {
        vcs.pull()?;
    }
    vcs.create_branch(&plan.release_branch)?;

    targets::configure_version(&tree, &context.project, &plan.devel_version)?.apply()?;
    bumper.autoconf.regenerate()?;
    targets::fixture_devel_marker(&tree, &plan.devel_version)?.apply()?;
    vcs.commit_all(&plan.commit_message)?;
    if !context.is_test {
        vcs.push(&plan.release_branch)?;
    }

    info!("Preparing {} on {}", plan.upcoming_version_branch, context.main_branch);

    vcs.checkout(&context.main_branch)?;
    vcs.create_branch(&plan.upcoming_version_branch)?;

    // An upcoming schema already in place means this version was bumped before
    let current_schema = read_schema_version(&tree.control_file())?;
    let upcoming_schema = &plan.upcoming_schema_version;
    if &current_schema == upcoming_schema {
        return Err(ValidationError::SchemaAlreadyCurrent {
            path: tree.control_file(),
            schema: current_schema,
        }
        .into());
    }

    // Version strings on the main branch
    targets::configure_version(&tree, &context.project, &plan.devel_version)?.apply()?;
    targets::build_tooling_version(&tree, &plan.upcoming_minor_version)?.apply()?;
    bumper.autoconf.regenerate()?;
    targets::fixture_devel_marker(&tree, &plan.devel_version)?.apply()?;
    for edit in targets::fixture_detail_lines(&tree, &plan.upcoming_minor_version)? {
        edit.apply()?;
    }

    // Schema bump: upgrade path tests, migration scripts, then the control file
    info!("Moving schema version from {} to {}", current_schema, upcoming_schema);
    for edit in targets::upgrade_statements(&tree, &current_schema, upcoming_schema)? {
        edit.apply()?;
    }
    migration::add_downgrade_tests(&tree, &current_schema, upcoming_schema)?;

    let upgrade_sql = migration::create_upgrade_script(&tree, &current_schema, upcoming_schema)?;
    vcs.stage(&upgrade_sql)?;
    let downgrade_sql = migration::create_downgrade_script(&tree, &current_schema, upcoming_schema)?;
    vcs.stage(&downgrade_sql)?;

    targets::control_default_version(&tree, upcoming_schema)?.apply()?;
    vcs.commit_all(&plan.commit_message)?;

    // Only a pushed branch can back a pull request
    let pull_request = if context.is_test {
        info!("Test mode: not pushing {}", plan.upcoming_version_branch);
        None
    } else {
        vcs.push(&plan.upcoming_version_branch)?;
        let request = NewPullRequest {
            title: plan.upcoming_pr_title(&context.project.name),
            head: plan.upcoming_version_branch.clone(),
            base: context.main_branch.clone(),
            body: String::new(),
        };
        let created = bumper.host()?.create_pull_request(&request)?;
        info!("Opened pull request #{}: {}", created.number, created.url);
        Some(created)
    };

    Ok(ReleaseOutcome {
        kind: plan.kind,
        release_branch: plan.release_branch.clone(),
        upcoming_version_branch: Some(plan.upcoming_version_branch.clone()),
        upgrade_sql_path: Some(upgrade_sql),
        downgrade_sql_path: Some(downgrade_sql),
        pr_branch: None,
        pull_request,
        cherry_picked: Vec::new(),
    })
}
