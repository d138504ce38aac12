//! Shared test utilities for integration tests.
//!
//! Not all functions are used by every test file, but they're shared across tests.
#![allow(dead_code)]

use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};
use git2::{Repository, RepositoryInitOptions, Signature};
use relprep::autoconf::Autoconf;
use relprep::error::{CommandError, GitHubError};
use relprep::git::VersionControl;
use relprep::github::{CreatedPullRequest, NewPullRequest, PullRequest, PullRequestCommit, RepositoryHost};
use relprep::{ProjectProfile, ReleaseContext, ReleaseVersion};

pub const CONFIGURE_IN: &str = "configure.in";
pub const CONFIG_PY: &str = "src/test/regress/upgrade/config.py";
pub const CONTROL: &str = "src/backend/distributed/citus.control";
pub const MULTI_EXTENSION_SQL: &str = "src/test/regress/sql/multi_extension.sql";
pub const MULTI_EXTENSION_OUT: &str = "src/test/regress/expected/multi_extension.out";
pub const SQL_DIR: &str = "src/backend/distributed/sql";

/// Write a minimal Citus source tree whose main branch is at 10.2devel with
/// schema 10.1-1.
pub fn write_citus_tree(root: &Path) {
    write_file(
        root,
        CONFIGURE_IN,
        "# Citus autoconf input script\n\
         AC_INIT([Citus], [10.2devel])\n\
         AC_CONFIG_SRCDIR([src/backend/distributed/shared_library_init.c])\n",
    );
    write_file(
        root,
        CONFIG_PY,
        "BEFORE_PG_UPGRADE_SCHEDULE = './before_pg_upgrade_schedule'\n\
         MASTER_VERSION = '10.1'\n\
         HOME = '/tmp'\n",
    );
    write_file(
        root,
        CONTROL,
        "# Citus extension\n\
         comment = 'Citus distributed database'\n\
         default_version = '10.1-1'\n\
         module_pathname = '$libdir/citus'\n\
         relocatable = false\n",
    );
    write_file(
        root,
        MULTI_EXTENSION_SQL,
        "-- Test upgrade paths\n\
         ALTER EXTENSION citus UPDATE TO '10.0-1';\n\
         SELECT * FROM print_extension_changes();\n\
         ALTER EXTENSION citus UPDATE TO '10.1-1';\n\
         SELECT * FROM print_extension_changes();\n\
         DROP TABLE prev_objects, extension_diff;\n\
         SHOW citus.version;\n",
    );
    write_file(
        root,
        MULTI_EXTENSION_OUT,
        "-- Test upgrade paths\n\
         ALTER EXTENSION citus UPDATE TO '10.0-1';\n\
         ALTER EXTENSION citus UPDATE TO '10.1-1';\n\
         DROP TABLE prev_objects, extension_diff;\n\
         SHOW citus.version;\n\
         \x20citus.version\n\
         ---------------------------------------------------------------------\n\
         \x2010.2devel\n\
         (1 row)\n\
         \n\
         ERROR:  loaded Citus library version differs from installed extension version\n\
         DETAIL:  Loaded library requires 10.2, but 8.0-1 was specified.\n\
         DETAIL:  Loaded library requires 10.2, but the installed extension version is 8.1-1.\n",
    );
}

pub fn write_file(root: &Path, rel: &str, content: &str) {
    let path = root.join(rel);
    std::fs::create_dir_all(path.parent().unwrap()).unwrap();
    std::fs::write(path, content).unwrap();
}

pub fn read(root: &Path, rel: &str) -> String {
    std::fs::read_to_string(root.join(rel))
        .unwrap_or_else(|e| panic!("Failed to read {}: {}", rel, e))
}

pub fn citus_profile() -> ProjectProfile {
    ProjectProfile::new("citus", "Citus", "citus", "master", "citusdata")
}

pub fn release_context(root: &Path, version: &str, is_test: bool) -> ReleaseContext {
    ReleaseContext {
        project: citus_profile(),
        version: ReleaseVersion::parse(version).unwrap(),
        main_branch: "master".into(),
        exec_path: root.to_path_buf(),
        is_test,
        cherry_pick: false,
        earliest_pr_date: None,
        upcoming_version: None,
        schema_version: None,
    }
}

/// A version-control call as seen by [`RecordingGit`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GitCall {
    Checkout(String),
    CreateBranch(String),
    Pull,
    Stage(PathBuf),
    CommitAll(String),
    Push(String),
    CherryPick(String),
}

/// Records every call and succeeds, except cherry-picks of `failing_sha`.
#[derive(Default)]
pub struct RecordingGit {
    pub calls: RefCell<Vec<GitCall>>,
    pub failing_sha: Option<String>,
}

impl RecordingGit {
    pub fn calls(&self) -> Vec<GitCall> {
        self.calls.borrow().clone()
    }

    pub fn pushes(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::Push(branch) => Some(branch),
                _ => None,
            })
            .collect()
    }

    pub fn cherry_picks(&self) -> Vec<String> {
        self.calls()
            .into_iter()
            .filter_map(|c| match c {
                GitCall::CherryPick(sha) => Some(sha),
                _ => None,
            })
            .collect()
    }

    fn record(&self, call: GitCall) {
        self.calls.borrow_mut().push(call);
    }
}

impl VersionControl for RecordingGit {
    fn checkout(&self, branch: &str) -> Result<(), CommandError> {
        self.record(GitCall::Checkout(branch.to_string()));
        Ok(())
    }

    fn create_branch(&self, name: &str) -> Result<(), CommandError> {
        self.record(GitCall::CreateBranch(name.to_string()));
        Ok(())
    }

    fn pull(&self) -> Result<(), CommandError> {
        self.record(GitCall::Pull);
        Ok(())
    }

    fn stage(&self, path: &Path) -> Result<(), CommandError> {
        self.record(GitCall::Stage(path.to_path_buf()));
        Ok(())
    }

    fn commit_all(&self, message: &str) -> Result<(), CommandError> {
        self.record(GitCall::CommitAll(message.to_string()));
        Ok(())
    }

    fn push(&self, branch: &str) -> Result<(), CommandError> {
        self.record(GitCall::Push(branch.to_string()));
        Ok(())
    }

    fn cherry_pick(&self, sha: &str) -> Result<(), CommandError> {
        self.record(GitCall::CherryPick(sha.to_string()));
        if self.failing_sha.as_deref() == Some(sha) {
            return Err(CommandError::NonZeroExit {
                command: format!("git cherry-pick -x {}", sha),
                code: Some(1),
                stderr: "error: could not apply".into(),
            });
        }
        Ok(())
    }
}

/// Counts regenerations without running autoconf.
#[derive(Default)]
pub struct CountingAutoconf {
    pub runs: Cell<usize>,
}

impl Autoconf for CountingAutoconf {
    fn regenerate(&self) -> Result<(), CommandError> {
        self.runs.set(self.runs.get() + 1);
        Ok(())
    }
}

/// Serves canned pull requests and records created ones.
#[derive(Default)]
pub struct StubHost {
    pub merged: Vec<PullRequest>,
    pub commits: HashMap<u64, Vec<PullRequestCommit>>,
    pub list_calls: RefCell<Vec<(String, Option<DateTime<Utc>>)>>,
    pub created: RefCell<Vec<NewPullRequest>>,
}

impl StubHost {
    pub fn with_pull_request(mut self, pr: PullRequest, commits: &[(&str, usize)]) -> Self {
        let commits = commits
            .iter()
            .map(|(sha, parent_count)| PullRequestCommit {
                sha: sha.to_string(),
                parent_count: *parent_count,
            })
            .collect();
        self.commits.insert(pr.number, commits);
        self.merged.push(pr);
        self
    }
}

impl RepositoryHost for StubHost {
    fn list_merged_pull_requests(
        &self,
        base: &str,
        merged_after: Option<DateTime<Utc>>,
        _merged_before: Option<DateTime<Utc>>,
    ) -> Result<Vec<PullRequest>, GitHubError> {
        self.list_calls
            .borrow_mut()
            .push((base.to_string(), merged_after));
        Ok(self.merged.clone())
    }

    fn list_pull_request_commits(&self, number: u64) -> Result<Vec<PullRequestCommit>, GitHubError> {
        Ok(self.commits.get(&number).cloned().unwrap_or_default())
    }

    fn create_pull_request(&self, request: &NewPullRequest) -> Result<CreatedPullRequest, GitHubError> {
        self.created.borrow_mut().push(request.clone());
        Ok(CreatedPullRequest {
            number: 1000 + self.created.borrow().len() as u64,
            url: format!("https://github.com/citusdata/citus/pull/{}", request.head),
        })
    }
}

pub fn pull_request(number: u64, merged_at: DateTime<Utc>, labels: &[&str]) -> PullRequest {
    PullRequest {
        number,
        title: format!("PR {}", number),
        merged_at: Some(merged_at),
        labels: labels.iter().map(|l| l.to_string()).collect(),
    }
}

/// A real git repository on `master` with a committer identity configured.
pub struct TestRepo {
    pub dir: tempfile::TempDir,
    pub repo: Repository,
}

impl TestRepo {
    pub fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let mut opts = RepositoryInitOptions::new();
        opts.initial_head("master");
        let repo = Repository::init_opts(dir.path(), &opts).expect("Failed to init git repo");
        {
            let mut config = repo.config().expect("Failed to open repo config");
            config.set_str("user.name", "Test User").unwrap();
            config.set_str("user.email", "test@example.com").unwrap();
            config.set_bool("commit.gpgsign", false).unwrap();
        }
        Self { dir, repo }
    }

    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Stage the whole working tree and commit it on HEAD.
    pub fn commit_all(&self, message: &str) -> git2::Oid {
        let sig = Signature::now("Test User", "test@example.com").expect("Failed to create signature");

        let mut index = self.repo.index().expect("Failed to get index");
        index
            .add_all(["*"], git2::IndexAddOption::DEFAULT, None)
            .expect("Failed to add files");
        index.write().expect("Failed to write index");
        let tree_id = index.write_tree().expect("Failed to write tree");
        let tree = self.repo.find_tree(tree_id).expect("Failed to find tree");

        let parent = self.repo.head().ok().and_then(|h| h.peel_to_commit().ok());
        let parents: Vec<&git2::Commit> = parent.iter().collect();

        self.repo
            .commit(Some("HEAD"), &sig, &sig, message, &tree, &parents)
            .expect("Failed to create commit")
    }

    pub fn head_message(&self) -> String {
        let commit = self.repo.head().unwrap().peel_to_commit().unwrap();
        commit.message().unwrap_or_default().to_string()
    }

    pub fn branch_exists(&self, name: &str) -> bool {
        self.repo.find_branch(name, git2::BranchType::Local).is_ok()
    }

    /// Content of `rel` at the tip of `branch`.
    pub fn file_at(&self, branch: &str, rel: &str) -> String {
        let commit = self
            .repo
            .find_branch(branch, git2::BranchType::Local)
            .unwrap()
            .get()
            .peel_to_commit()
            .unwrap();
        let entry = commit.tree().unwrap().get_path(Path::new(rel)).unwrap();
        let blob = self.repo.find_blob(entry.id()).unwrap();
        String::from_utf8(blob.content().to_vec()).unwrap()
    }
}
