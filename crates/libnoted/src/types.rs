use std::{
    fmt,
    path::{Path, PathBuf},
};

/// What happened to one repository during a commit or upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RepoStatus {
    /// A new commit was created.
    Committed,
    /// The scoped stage held no changes, so no commit was attempted.
    NothingToCommit,
    /// Local commits were pushed to `origin`.
    Pushed,
    /// No remote named `origin` exists; local history is intact.
    PushSkippedNoRemote,
    /// The upstream already has every local commit.
    UpToDate,
    /// A git step failed; the message is git's own explanation.
    Failed(String),
}

impl RepoStatus {
    /// Whether this status reports a failure.
    pub fn is_failure(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

impl fmt::Display for RepoStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Committed => write!(f, "committed"),
            Self::NothingToCommit => write!(f, "nothing to commit"),
            Self::Pushed => write!(f, "pushed"),
            Self::PushSkippedNoRemote => write!(f, "push skipped (no origin remote)"),
            Self::UpToDate => write!(f, "already up to date"),
            Self::Failed(reason) => write!(f, "failed: {reason}"),
        }
    }
}

/// Outcome for a single repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoOutcome {
    /// Root of the repository.
    pub repo: PathBuf,
    /// What happened there.
    pub status: RepoStatus,
}

/// Ordered per-repository outcomes, innermost repository first.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitOutcome {
    /// Outcomes in the order the repositories were processed.
    pub repos: Vec<RepoOutcome>,
}

impl CommitOutcome {
    /// Record the status of `repo`.
    pub fn push(&mut self, repo: PathBuf, status: RepoStatus) {
        self.repos.push(RepoOutcome { repo, status });
    }

    /// Append every outcome of `other`.
    pub fn extend(&mut self, other: Self) {
        self.repos.extend(other.repos);
    }

    /// Status recorded for `repo`, if it was touched.
    pub fn status_of(&self, repo: &Path) -> Option<&RepoStatus> {
        self.repos
            .iter()
            .find(|outcome| outcome.repo == repo)
            .map(|outcome| &outcome.status)
    }

    /// The first failed repository, if any.
    pub fn first_failure(&self) -> Option<&RepoOutcome> {
        self.repos.iter().find(|outcome| outcome.status.is_failure())
    }

    /// Repository roots in processing order, without duplicates.
    pub fn repo_roots(&self) -> Vec<PathBuf> {
        let mut roots: Vec<PathBuf> = Vec::new();
        for outcome in &self.repos {
            if !roots.contains(&outcome.repo) {
                roots.push(outcome.repo.clone());
            }
        }
        roots
    }
}

/// Result of committing and then pushing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UploadOutcome {
    /// Commit propagation results.
    pub committed: CommitOutcome,
    /// Push results for every repository that committed cleanly.
    pub pushed: CommitOutcome,
}

impl UploadOutcome {
    /// The first failed commit or push, if any.
    pub fn first_failure(&self) -> Option<&RepoOutcome> {
        self.committed
            .first_failure()
            .or_else(|| self.pushed.first_failure())
    }
}

/// Snapshot used to decide whether a repository needs a commit or a push.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeStatus {
    /// Whether the working tree has no staged, unstaged, or untracked changes.
    pub clean: bool,
    /// Commits ahead of the upstream branch; `None` without an upstream.
    pub ahead: Option<u32>,
    /// Whether a remote named `origin` exists.
    pub has_origin: bool,
}

/// Change status of a named repository for `noted status`.
#[derive(Debug, Clone)]
pub struct RepoChangeStatus {
    /// Display name (workspace name, or the parent directory name).
    pub name: String,
    /// Root of the repository.
    pub path: PathBuf,
    /// Branch currently checked out, `None` when detached.
    pub branch: Option<String>,
    /// The change snapshot.
    pub status: ChangeStatus,
}

/// Where a new parent repository should be published.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RemoteChoice {
    /// Keep it local.
    Local,
    /// Create a GitHub repository through the remote provider.
    GitHub,
    /// Push to a user-supplied URL.
    Url(String),
}

/// A workspace registered in the parent repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WorkspaceInfo {
    /// Submodule name from `.gitmodules`.
    pub name: String,
    /// Path relative to the parent root.
    pub path: PathBuf,
    /// Submodule URL.
    pub url: Option<String>,
    /// Whether the workspace directory is checked out.
    pub present: bool,
}

/// A file or directory created by noted, with the commit it triggered.
#[derive(Debug, Clone)]
pub struct CreatedEntry {
    /// Final name after collision avoidance.
    pub name: String,
    /// Absolute path of the new entry.
    pub path: PathBuf,
    /// Commit propagation result.
    pub outcome: CommitOutcome,
}

/// Result of creating a parent repository.
#[derive(Debug, Clone)]
pub struct InitReport {
    /// Root of the new parent repository.
    pub root: PathBuf,
    /// Remote URL configured as `origin`, if any.
    pub remote_url: Option<String>,
    /// Push result when a remote was configured.
    pub push: Option<RepoStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repo_roots_are_deduplicated_in_order() {
        let mut outcome = CommitOutcome::default();
        outcome.push(PathBuf::from("/ws"), RepoStatus::Committed);
        outcome.push(PathBuf::from("/parent"), RepoStatus::Committed);
        outcome.push(PathBuf::from("/ws"), RepoStatus::Pushed);

        assert_eq!(
            outcome.repo_roots(),
            vec![PathBuf::from("/ws"), PathBuf::from("/parent")]
        );
        assert_eq!(
            outcome.status_of(Path::new("/parent")),
            Some(&RepoStatus::Committed)
        );
        assert!(outcome.first_failure().is_none());
    }

    #[test]
    fn failures_are_reported() {
        let mut outcome = CommitOutcome::default();
        outcome.push(PathBuf::from("/ws"), RepoStatus::NothingToCommit);
        outcome.push(
            PathBuf::from("/parent"),
            RepoStatus::Failed("index.lock exists".to_string()),
        );

        let failure = outcome.first_failure().unwrap();
        assert_eq!(failure.repo, PathBuf::from("/parent"));
        assert_eq!(failure.status.to_string(), "failed: index.lock exists");
    }
}
