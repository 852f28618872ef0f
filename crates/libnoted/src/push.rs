use std::path::Path;

use anyhow::Result;
use tracing::info;

use crate::{
    git,
    types::{ChangeStatus, CommitOutcome, RepoStatus},
};

/// Name of the remote noted pushes to.
pub const ORIGIN: &str = "origin";

/// Read the current change status of `repo_root`.
pub fn change_status(repo_root: &Path) -> Result<ChangeStatus> {
    Ok(ChangeStatus {
        clean: !git::has_uncommitted_changes(repo_root)?,
        ahead: git::ahead_count(repo_root)?,
        has_origin: git::has_remote(repo_root, ORIGIN)?,
    })
}

/// Push the current branch of `repo_root` to `origin` when it has unpushed commits.
///
/// A branch without an upstream is pushed with `-u`.
pub fn push_repository(repo_root: &Path) -> RepoStatus {
    let status = match change_status(repo_root) {
        Ok(status) => status,
        Err(err) => return RepoStatus::Failed(format!("{err:#}")),
    };
    if !status.has_origin {
        return RepoStatus::PushSkippedNoRemote;
    }
    if status.ahead == Some(0) {
        return RepoStatus::UpToDate;
    }

    let branch = match git::current_branch(repo_root) {
        Ok(Some(branch)) => branch,
        Ok(None) => return RepoStatus::Failed("cannot push a detached HEAD".to_string()),
        Err(err) => return RepoStatus::Failed(format!("{err:#}")),
    };

    match git::push(repo_root, ORIGIN, &branch, status.ahead.is_none()) {
        Ok(()) => {
            info!(repo = %repo_root.display(), branch, "pushed");
            RepoStatus::Pushed
        }
        Err(err) => RepoStatus::Failed(format!("{err:#}")),
    }
}

/// Push every repository touched by `committed`, innermost first.
///
/// Repositories whose commit step failed are not pushed.
pub fn push_all(committed: &CommitOutcome) -> CommitOutcome {
    let mut pushed = CommitOutcome::default();
    for root in committed.repo_roots() {
        let failed = committed
            .repos
            .iter()
            .any(|outcome| outcome.repo == root && outcome.status.is_failure());
        if failed {
            continue;
        }
        let status = push_repository(&root);
        pushed.push(root, status);
    }
    pushed
}

#[cfg(test)]
mod tests {
    use std::{fs, path::PathBuf, process::Command};

    use tempfile::TempDir;

    use super::*;

    fn run_git(repo_dir: &Path, args: &[&str]) {
        let status = Command::new("git")
            .current_dir(repo_dir)
            .args(args)
            .status()
            .unwrap();
        assert!(status.success(), "git {} failed", args.join(" "));
    }

    fn init_repo(repo_dir: &Path) {
        fs::create_dir_all(repo_dir).unwrap();
        run_git(repo_dir, &["init", "--quiet"]);
        run_git(repo_dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
        run_git(repo_dir, &["config", "user.email", "test@example.com"]);
        run_git(repo_dir, &["config", "user.name", "Test User"]);
        fs::write(repo_dir.join("README.md"), "base").unwrap();
        run_git(repo_dir, &["add", "README.md"]);
        run_git(repo_dir, &["commit", "--quiet", "-m", "Initial commit"]);
    }

    fn init_repo_with_origin(tmp: &TempDir) -> (PathBuf, PathBuf) {
        let origin_dir = tmp.path().join("origin.git");
        fs::create_dir_all(&origin_dir).unwrap();
        run_git(&origin_dir, &["init", "--bare", "--quiet"]);

        let repo_dir = tmp.path().join("repo");
        init_repo(&repo_dir);
        run_git(
            &repo_dir,
            &["remote", "add", "origin", origin_dir.to_str().unwrap()],
        );

        (repo_dir, origin_dir)
    }

    #[test]
    fn repository_without_origin_is_skipped() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        init_repo(&repo);

        let status = change_status(&repo).unwrap();
        assert!(status.clean);
        assert!(!status.has_origin);
        assert_eq!(status.ahead, None);

        assert_eq!(push_repository(&repo), RepoStatus::PushSkippedNoRemote);
    }

    #[test]
    fn first_push_sets_upstream_then_reports_up_to_date() {
        let tmp = TempDir::new().unwrap();
        let (repo, origin) = init_repo_with_origin(&tmp);

        assert_eq!(push_repository(&repo), RepoStatus::Pushed);
        assert_eq!(change_status(&repo).unwrap().ahead, Some(0));
        assert_eq!(push_repository(&repo), RepoStatus::UpToDate);

        let local = Command::new("git")
            .current_dir(&repo)
            .args(["rev-parse", "HEAD"])
            .output()
            .unwrap();
        let remote = Command::new("git")
            .current_dir(&origin)
            .args(["rev-parse", "main"])
            .output()
            .unwrap();
        assert_eq!(local.stdout, remote.stdout);
    }

    #[test]
    fn ahead_commits_are_pushed() {
        let tmp = TempDir::new().unwrap();
        let (repo, _origin) = init_repo_with_origin(&tmp);
        assert_eq!(push_repository(&repo), RepoStatus::Pushed);

        fs::write(repo.join("note.md"), "# note").unwrap();
        run_git(&repo, &["add", "note.md"]);
        run_git(&repo, &["commit", "--quiet", "-m", "Add note"]);
        assert_eq!(change_status(&repo).unwrap().ahead, Some(1));

        assert_eq!(push_repository(&repo), RepoStatus::Pushed);
        assert_eq!(change_status(&repo).unwrap().ahead, Some(0));
    }

    #[test]
    fn unreachable_origin_fails() {
        let tmp = TempDir::new().unwrap();
        let repo = tmp.path().join("repo");
        init_repo(&repo);
        let missing = tmp.path().join("missing.git");
        run_git(&repo, &["remote", "add", "origin", missing.to_str().unwrap()]);

        assert!(push_repository(&repo).is_failure());
    }

    #[test]
    fn push_all_skips_failed_repositories() {
        let tmp = TempDir::new().unwrap();
        let (repo, _origin) = init_repo_with_origin(&tmp);
        let other = tmp.path().join("other");
        init_repo(&other);

        let mut committed = CommitOutcome::default();
        committed.push(other.clone(), RepoStatus::Failed("boom".to_string()));
        committed.push(repo.clone(), RepoStatus::Committed);

        let pushed = push_all(&committed);
        assert_eq!(pushed.repos.len(), 1);
        assert_eq!(pushed.status_of(&repo), Some(&RepoStatus::Pushed));
    }
}
