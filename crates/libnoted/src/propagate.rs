use std::{
    collections::HashSet,
    fs, iter,
    path::{Path, PathBuf},
};

use tracing::{debug, info, warn};

use crate::{
    error::{NotedError, Result},
    git,
    locate::{find_repository_root, relative_pathspec},
    submodule::find_superproject_root,
    types::{CommitOutcome, RepoStatus},
};

/// Branch commits land on when a repository is found in detached HEAD state.
pub const DEFAULT_BRANCH: &str = "main";

/// A request to commit `path` and cascade the commit to every superproject.
#[derive(Debug, Clone)]
pub struct CommitRequest {
    /// File or directory whose subtree is committed.
    pub path: PathBuf,
    /// Further paths in the same repository committed together with `path`.
    pub extra_paths: Vec<PathBuf>,
    /// Commit message for the innermost repository.
    pub message: String,
    /// Branch to check out when a repository is detached.
    pub branch: String,
}

impl CommitRequest {
    /// Build a request on the default branch.
    pub fn new(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            extra_paths: Vec::new(),
            message: message.into(),
            branch: DEFAULT_BRANCH.to_string(),
        }
    }

    /// Also commit `path` in the innermost repository.
    pub fn with_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.extra_paths.push(path.into());
        self
    }

    /// Use `branch` instead of the default branch.
    pub fn with_branch(mut self, branch: impl Into<String>) -> Self {
        self.branch = branch.into();
        self
    }
}

/// One repository on the way up, and what to commit there.
struct Level {
    /// Repository root.
    root: PathBuf,
    /// Pathspecs relative to `root` to stage and commit.
    pathspecs: Vec<String>,
    /// Message for this repository's commit.
    message: String,
}

/// Commit `request.path` in its repository, then keep committing the updated
/// submodule entry in each superproject until a repository has none.
///
/// Failures are reported per repository in the returned outcome and stop the
/// climb; commits already made are kept. A missing repository, or an extra
/// path outside the innermost repository, is an error and commits nothing.
pub fn propagate_commit(request: &CommitRequest) -> Result<CommitOutcome> {
    let repo_root =
        find_repository_root(&request.path).ok_or_else(|| NotedError::NoRepository {
            path: request.path.clone(),
        })?;
    let pathspecs = iter::once(&request.path)
        .chain(&request.extra_paths)
        .map(|path| {
            relative_pathspec(&repo_root, path).ok_or_else(|| {
                NotedError::ContextError(format!(
                    "{} is not inside repository {}",
                    path.display(),
                    repo_root.display()
                ))
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let mut outcome = CommitOutcome::default();
    let mut visited = HashSet::new();
    let mut level = Level {
        root: repo_root,
        pathspecs,
        message: request.message.clone(),
    };

    loop {
        visited.insert(level.root.clone());
        let status = commit_level(&level, &request.branch);
        let failed = status.is_failure();
        outcome.push(level.root.clone(), status);
        if failed {
            break;
        }

        let Some(next) = superproject_level(&level.root, &request.message) else {
            break;
        };
        if visited.contains(&next.root) {
            warn!(repo = %next.root.display(), "superproject cycle detected, stopping");
            break;
        }
        level = next;
    }

    Ok(outcome)
}

/// Build the level for the superproject of `repo_root`, if it has one.
fn superproject_level(repo_root: &Path, message: &str) -> Option<Level> {
    let superproject = find_superproject_root(repo_root)?;
    let superproject = fs::canonicalize(&superproject).unwrap_or(superproject);
    let pathspec = relative_pathspec(&superproject, repo_root)?;
    let name = repo_root
        .file_name()
        .map(|name| name.to_string_lossy().to_string())
        .unwrap_or_else(|| pathspec.clone());
    debug!(
        repo = %repo_root.display(),
        superproject = %superproject.display(),
        "cascading commit to superproject"
    );
    Some(Level {
        root: superproject,
        pathspecs: vec![pathspec],
        message: format!("Update submodule: {name} - {message}"),
    })
}

/// Stage and commit one level, reporting the result as a status.
fn commit_level(level: &Level, branch: &str) -> RepoStatus {
    if let Err(err) = ensure_branch(&level.root, branch) {
        return RepoStatus::Failed(format!("{err:#}"));
    }
    let pathspecs: Vec<&str> = level.pathspecs.iter().map(String::as_str).collect();
    if let Err(err) = git::add_paths(&level.root, &pathspecs) {
        return RepoStatus::Failed(format!("{err:#}"));
    }
    match git::has_staged_changes(&level.root, &pathspecs) {
        Ok(true) => {}
        Ok(false) => {
            debug!(repo = %level.root.display(), pathspecs = ?level.pathspecs, "nothing to commit");
            return RepoStatus::NothingToCommit;
        }
        Err(err) => return RepoStatus::Failed(format!("{err:#}")),
    }
    match git::commit_paths(&level.root, &level.message, &pathspecs) {
        Ok(()) => {
            info!(repo = %level.root.display(), message = %level.message, "committed");
            RepoStatus::Committed
        }
        Err(err) => RepoStatus::Failed(format!("{err:#}")),
    }
}

/// Make sure `repo_root` is on a named branch, checking out (or creating)
/// `branch` when HEAD is detached.
pub fn ensure_branch(repo_root: &Path, branch: &str) -> anyhow::Result<()> {
    if git::current_branch(repo_root)?.is_some() {
        return Ok(());
    }
    if git::has_branch(repo_root, branch)? {
        info!(repo = %repo_root.display(), branch, "detached HEAD, checking out branch");
        git::checkout(repo_root, branch)
    } else {
        info!(repo = %repo_root.display(), branch, "detached HEAD, creating branch");
        git::checkout_new(repo_root, branch)
    }
}
