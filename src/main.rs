//! relprep - CLI entry point.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::Parser;
use dialoguer::Confirm;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use relprep::autoconf::SystemAutoconf;
use relprep::config::{parse_pr_date, upcoming_version_override};
use relprep::git::{SystemGit, repository};
use relprep::github::{GitHubHost, RepositoryHost, get_github_token, parse_github_remote, parse_repository_slug};
use relprep::process::check_required_tools;
use relprep::release::needs_repository_host;
use relprep::{
    ProjectCatalog, ProjectProfile, ReleaseBumper, ReleaseContext, ReleaseKind, ReleaseOutcome, ReleasePlan,
    ReleaseVersion,
};

/// Prepare a release branch and bump versions for a Citus project.
#[derive(Parser, Debug)]
#[command(name = "relprep")]
#[command(about = "Prepare release branches and version bumps for Citus projects")]
#[command(disable_version_flag = true)]
struct Cli {
    /// Project to release (citus or citus-enterprise)
    #[arg(long)]
    project: String,

    /// Version to release, e.g. 10.2.0 (major) or 10.2.1 (patch)
    #[arg(long = "version")]
    release_version: ReleaseVersion,

    /// Main development branch (defaults to the project's default branch)
    #[arg(long)]
    main_branch: Option<String>,

    /// Root of the checked-out source tree (defaults to the current directory)
    #[arg(long)]
    exec_path: Option<PathBuf>,

    /// GitHub repository as owner/name (defaults to the URL of --remote)
    #[arg(long)]
    repo: Option<String>,

    /// Git remote branches are pushed to
    #[arg(long, default_value = "origin")]
    remote: String,

    /// Backport PRs merged on or after this date (YYYY.MM.DD)
    #[arg(long)]
    earliest_pr_date: Option<String>,

    /// Cherry-pick backport-labelled PRs (patch releases only)
    #[arg(long)]
    cherry_pick: bool,

    /// Schema version to set in the control file (patch releases only)
    #[arg(long)]
    schema_version: Option<String>,

    /// Test run: no pushes, no pull requests, release branch suffixed with -test
    #[arg(long)]
    test: bool,

    /// Skip the confirmation prompt
    #[arg(short = 'y', long)]
    yes: bool,

    /// Print the outcome as JSON
    #[arg(long)]
    json: bool,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    check_required_tools().context("git and autoconf are required")?;

    let catalog = ProjectCatalog::builtin();
    let project = catalog.get(&cli.project)?.clone();

    let exec_path = match &cli.exec_path {
        Some(path) => path.clone(),
        None => std::env::current_dir().context("Could not determine current directory")?,
    };

    let earliest_pr_date = cli
        .earliest_pr_date
        .as_deref()
        .map(parse_pr_date)
        .transpose()?;
    let upcoming_version = upcoming_version_override()?;

    let context = ReleaseContext {
        main_branch: cli
            .main_branch
            .clone()
            .unwrap_or_else(|| project.default_branch.clone()),
        project,
        version: cli.release_version.clone(),
        exec_path,
        is_test: cli.test,
        cherry_pick: cli.cherry_pick,
        earliest_pr_date,
        upcoming_version,
        schema_version: cli.schema_version.clone(),
    };
    context.validate()?;

    let host = if needs_repository_host(&context) {
        Some(connect_host(&cli, &context).context("GitHub access is required for this release")?)
    } else {
        None
    };

    let plan = ReleasePlan::new(&context, &uuid::Uuid::new_v4().to_string())?;
    preflight(&context, &plan)?;
    print_summary(&context, &plan);

    if !context.is_test && !cli.yes {
        println!();
        let confirmed = Confirm::new()
            .with_prompt("Proceed?")
            .default(false)
            .interact()
            .context("Failed to read confirmation")?;
        if !confirmed {
            bail!("Release cancelled");
        }
    }

    let vcs = SystemGit::new(&context.exec_path).with_remote(cli.remote.clone());
    let autoconf = SystemAutoconf::new(&context.exec_path);
    let bumper = ReleaseBumper::new(
        &vcs,
        &autoconf,
        host.as_ref().map(|h| h as &dyn RepositoryHost),
    );

    let outcome = bumper
        .bump_with_plan(&context, &plan)
        .with_context(|| format!("Release of {} {} failed", context.project.name, context.version))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&outcome)?);
    } else {
        print_outcome(&outcome);
    }

    Ok(())
}

/// Authenticate and resolve which repository pull requests live in.
fn connect_host(cli: &Cli, context: &ReleaseContext) -> Result<GitHubHost> {
    let token = get_github_token()?;
    let (owner, repo) = resolve_repository(cli.repo.as_deref(), &cli.remote, &context.exec_path, &context.project)?;
    info!("Using GitHub repository {}/{}", owner, repo);
    Ok(GitHubHost::connect(&token, &owner, &repo)?)
}

/// `--repo`, else the push remote of the tree, else the profile default.
fn resolve_repository(
    explicit: Option<&str>,
    remote: &str,
    exec_path: &Path,
    project: &ProjectProfile,
) -> Result<(String, String)> {
    if let Some(slug) = explicit {
        return parse_repository_slug(slug).with_context(|| format!("Invalid --repo value '{}'", slug));
    }

    let from_remote = repository::open(exec_path)
        .ok()
        .and_then(|repo| repository::remote_url(&repo, remote))
        .and_then(|url| match parse_github_remote(&url) {
            Ok(parsed) => Some(parsed),
            Err(_) => {
                warn!("{} remote {} is not a GitHub URL", remote, url);
                None
            }
        });

    Ok(from_remote.unwrap_or_else(|| (project.owner.clone(), project.name.clone())))
}

/// Fail before any edit when a test-mode patch release has no branch to work on.
fn preflight(context: &ReleaseContext, plan: &ReleasePlan) -> Result<()> {
    let repo = repository::open(&context.exec_path)
        .with_context(|| format!("{} is not inside a git repository", context.exec_path.display()))?;

    match repository::current_branch(&repo) {
        Some(branch) => info!("Starting from branch {}", branch),
        None => warn!("HEAD is detached; the release checks out its own branches"),
    }

    if plan.kind == ReleaseKind::Patch && context.is_test && !repository::branch_exists(&repo, &plan.release_branch) {
        bail!(
            "Test-mode patch releases work on {}, which does not exist locally. Create it first.",
            plan.release_branch
        );
    }
    Ok(())
}

fn print_summary(context: &ReleaseContext, plan: &ReleasePlan) {
    println!("Release summary:");
    println!("  Project:        {}", context.project.name);
    println!("  Version:        {} ({})", context.version, plan.kind);
    println!("  Source tree:    {}", context.exec_path.display());
    println!("  Release branch: {}", plan.release_branch);
    if plan.kind == ReleaseKind::Major {
        println!("  Main branch:    {} -> {}", context.main_branch, plan.devel_version);
        println!("  Schema:         -> {}", plan.upcoming_schema_version);
    } else if context.cherry_pick {
        println!("  Cherry-pick:    backports merged into {}", context.main_branch);
    }
    if context.is_test {
        println!("  Mode:           test (nothing is pushed)");
    }
}

fn print_outcome(outcome: &ReleaseOutcome) {
    println!();
    println!("✓ Release branch {}", outcome.release_branch);
    if let Some(branch) = &outcome.upcoming_version_branch {
        println!("✓ Upcoming version branch {}", branch);
    }
    if let Some(path) = &outcome.upgrade_sql_path {
        println!("✓ Created {}", path.display());
    }
    if let Some(path) = &outcome.downgrade_sql_path {
        println!("✓ Created {}", path.display());
    }
    if !outcome.cherry_picked.is_empty() {
        println!("✓ Cherry-picked {} commits", outcome.cherry_picked.len());
    }
    if let Some(branch) = &outcome.pr_branch {
        println!("✓ Pull request branch {}", branch);
    }
    if let Some(pr) = &outcome.pull_request {
        println!("✓ Opened pull request #{}: {}", pr.number, pr.url);
    }
}
