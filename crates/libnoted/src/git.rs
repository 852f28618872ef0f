use std::{
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result};
use tracing::debug;

/// File name of git's submodule registry.
pub const GITMODULES_FILE: &str = ".gitmodules";

/// Run a git command in `repo_path` and return its output regardless of exit status.
fn git_command(repo_path: &Path, args: &[&str]) -> Result<Output> {
    debug!(repo = %repo_path.display(), "git {}", args.join(" "));
    Command::new("git")
        .current_dir(repo_path)
        .args(args)
        .output()
        .with_context(|| format!("Failed to execute git command: git {}", args.join(" ")))
}

/// Run a git command with the given arguments in the specified directory.
/// Returns the output if successful, otherwise returns an error with the full command details.
fn run_git(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let output = git_command(repo_path, args)?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        let command = format!("git {}", args.join(" "));
        anyhow::bail!("Git command failed: {}\nError: {}", command, stderr.trim());
    }

    Ok(output)
}

/// Trimmed stdout of a finished git command.
fn stdout_of(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

/// Convert a path into the `&str` form git expects on its command line.
fn path_arg(path: &Path) -> Result<&str> {
    path.to_str()
        .ok_or_else(|| anyhow::anyhow!("Invalid path: {}", path.display()))
}

/// Initialise a repository in `repo_path` whose unborn HEAD points at `branch`.
pub fn init(repo_path: &Path, branch: &str) -> Result<()> {
    run_git(repo_path, &["init", "--quiet"])?;
    let head = format!("refs/heads/{branch}");
    run_git(repo_path, &["symbolic-ref", "HEAD", &head])?;
    Ok(())
}

/// Return the checked-out branch, or `None` when HEAD is detached.
pub fn current_branch(repo_path: &Path) -> Result<Option<String>> {
    let output = git_command(repo_path, &["symbolic-ref", "--short", "-q", "HEAD"])?;
    match output.status.code() {
        Some(0) => Ok(Some(stdout_of(&output))),
        // -q turns "not a symbolic ref" into a silent exit 1
        Some(1) => Ok(None),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to read HEAD: {}", stderr.trim())
        }
    }
}

/// Determine if a branch named `branch_name` exists in the repository.
pub fn has_branch(repo_path: &Path, branch_name: &str) -> Result<bool> {
    let output = run_git(repo_path, &["branch", "--list", branch_name])?;
    Ok(!stdout_of(&output).is_empty())
}

/// Check out the existing branch `branch_name`.
pub fn checkout(repo_path: &Path, branch_name: &str) -> Result<()> {
    run_git(repo_path, &["checkout", "--quiet", branch_name])?;
    Ok(())
}

/// Create `branch_name` at the current HEAD and check it out.
pub fn checkout_new(repo_path: &Path, branch_name: &str) -> Result<()> {
    run_git(repo_path, &["checkout", "--quiet", "-b", branch_name])?;
    Ok(())
}

/// Build `git <prefix> -- <pathspecs>` arguments.
fn with_pathspecs<'a>(prefix: &[&'a str], pathspecs: &[&'a str]) -> Vec<&'a str> {
    let mut args = prefix.to_vec();
    args.push("--");
    args.extend_from_slice(pathspecs);
    args
}

/// Stage every change (including deletions and untracked files) below `pathspecs`.
pub fn add_paths(repo_path: &Path, pathspecs: &[&str]) -> Result<()> {
    run_git(repo_path, &with_pathspecs(&["add", "-A"], pathspecs))?;
    Ok(())
}

/// Check whether the index differs from HEAD below `pathspecs`.
pub fn has_staged_changes(repo_path: &Path, pathspecs: &[&str]) -> Result<bool> {
    let args = with_pathspecs(&["diff", "--cached", "--quiet"], pathspecs);
    let output = git_command(repo_path, &args)?;
    match output.status.code() {
        Some(0) => Ok(false),
        Some(1) => Ok(true),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!(
                "Git command failed: git {}\nError: {}",
                args.join(" "),
                stderr.trim()
            )
        }
    }
}

/// Commit only the staged content below `pathspecs` with the provided `message`.
pub fn commit_paths(repo_path: &Path, message: &str, pathspecs: &[&str]) -> Result<()> {
    run_git(
        repo_path,
        &with_pathspecs(&["commit", "--quiet", "-m", message], pathspecs),
    )?;
    Ok(())
}

/// Query the superproject working tree of `repo_path`.
///
/// Returns `Ok(None)` when git answers with empty output, which is how it
/// reports "not a submodule".
pub fn superproject_working_tree(repo_path: &Path) -> Result<Option<PathBuf>> {
    let output = run_git(repo_path, &["rev-parse", "--show-superproject-working-tree"])?;
    let path = stdout_of(&output);
    if path.is_empty() {
        Ok(None)
    } else {
        Ok(Some(PathBuf::from(path)))
    }
}

/// Absolute path of the repository's git directory.
pub fn git_dir(repo_path: &Path) -> Result<PathBuf> {
    let output = run_git(repo_path, &["rev-parse", "--absolute-git-dir"])?;
    Ok(PathBuf::from(stdout_of(&output)))
}

/// Check whether the repository has staged or unstaged changes.
pub fn has_uncommitted_changes(repo_path: &Path) -> Result<bool> {
    let output = run_git(repo_path, &["status", "--porcelain"])?;
    Ok(!stdout_of(&output).is_empty())
}

/// List the names of configured remotes.
pub fn remotes(repo_path: &Path) -> Result<Vec<String>> {
    let output = run_git(repo_path, &["remote"])?;
    Ok(stdout_of(&output)
        .lines()
        .map(|line| line.trim().to_string())
        .filter(|remote| !remote.is_empty())
        .collect())
}

/// Determine if a remote named `name` is configured.
pub fn has_remote(repo_path: &Path, name: &str) -> Result<bool> {
    Ok(remotes(repo_path)?.iter().any(|remote| remote == name))
}

/// Register a remote named `name` pointing at `url`.
pub fn add_remote(repo_path: &Path, name: &str, url: &str) -> Result<()> {
    run_git(repo_path, &["remote", "add", name, url])?;
    Ok(())
}

/// Number of local commits not yet on the upstream branch.
///
/// Returns `None` when the current branch has no upstream configured.
pub fn ahead_count(repo_path: &Path) -> Result<Option<u32>> {
    let output = git_command(repo_path, &["rev-list", "--count", "@{upstream}..HEAD"])?;
    if !output.status.success() {
        return Ok(None);
    }
    let count = stdout_of(&output)
        .parse::<u32>()
        .context("Unexpected output from git rev-list --count")?;
    Ok(Some(count))
}

/// Push `branch` to `remote`, optionally recording it as the upstream.
pub fn push(repo_path: &Path, remote: &str, branch: &str, set_upstream: bool) -> Result<()> {
    let mut args = vec!["push", "--quiet"];
    if set_upstream {
        args.push("-u");
    }
    args.push(remote);
    args.push(branch);
    run_git(repo_path, &args)?;
    Ok(())
}

/// Register the repository at `path` (relative to `repo_path`) as a submodule with `url`.
pub fn submodule_add(repo_path: &Path, url: &str, path: &Path) -> Result<()> {
    let path = path_arg(path)?;
    run_git(
        repo_path,
        &[
            "-c",
            "protocol.file.allow=always",
            "submodule",
            "add",
            "--quiet",
            url,
            path,
        ],
    )?;
    Ok(())
}

/// Unregister the submodule at `path`, discarding local modifications.
pub fn submodule_deinit(repo_path: &Path, path: &Path) -> Result<()> {
    run_git(
        repo_path,
        &["submodule", "deinit", "--quiet", "-f", "--", path_arg(path)?],
    )?;
    Ok(())
}

/// Move the git directory of the submodule at `path` into the superproject's `.git/modules`.
pub fn absorb_git_dirs(repo_path: &Path, path: &Path) -> Result<()> {
    run_git(
        repo_path,
        &["submodule", "absorbgitdirs", "--quiet", "--", path_arg(path)?],
    )?;
    Ok(())
}

/// Drop the `[submodule "<name>"]` section from `.gitmodules`.
pub fn remove_submodule_section(repo_path: &Path, name: &str) -> Result<()> {
    let section = format!("submodule.{name}");
    run_git(
        repo_path,
        &["config", "-f", GITMODULES_FILE, "--remove-section", &section],
    )?;
    Ok(())
}

/// A submodule registered in `.gitmodules`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmoduleEntry {
    /// Submodule name with git's quoting removed.
    pub name: String,
    /// Checkout path relative to the superproject root.
    pub path: Option<PathBuf>,
    /// Clone URL.
    pub url: Option<String>,
}

/// List the submodules registered in `.gitmodules`, in file order.
///
/// Git reads the file, so quoting, escapes, comments and key case follow its rules.
pub fn submodule_entries(repo_path: &Path) -> Result<Vec<SubmoduleEntry>> {
    if !repo_path.join(GITMODULES_FILE).is_file() {
        return Ok(Vec::new());
    }
    let output = git_command(
        repo_path,
        &[
            "config",
            "-f",
            GITMODULES_FILE,
            "-z",
            "--get-regexp",
            r"^submodule\..*\.(path|url)$",
        ],
    )?;
    match output.status.code() {
        Some(0) => {
            let stdout = String::from_utf8_lossy(&output.stdout);
            Ok(parse_submodule_records(&stdout))
        }
        // No matching keys
        Some(1) => Ok(Vec::new()),
        _ => {
            let stderr = String::from_utf8_lossy(&output.stderr);
            anyhow::bail!("Failed to read {GITMODULES_FILE}: {}", stderr.trim())
        }
    }
}

/// Group the NUL-separated `key\nvalue` records of `git config -z` by submodule.
fn parse_submodule_records(raw: &str) -> Vec<SubmoduleEntry> {
    let mut entries: Vec<SubmoduleEntry> = Vec::new();
    for record in raw.split('\0').filter(|record| !record.is_empty()) {
        let (key, value) = record.split_once('\n').unwrap_or((record, ""));
        // The name may itself contain dots; the field is always the last component
        let Some((name, field)) = key
            .strip_prefix("submodule.")
            .and_then(|rest| rest.rsplit_once('.'))
        else {
            continue;
        };

        let index = match entries.iter().position(|entry| entry.name == name) {
            Some(index) => index,
            None => {
                entries.push(SubmoduleEntry {
                    name: name.to_string(),
                    path: None,
                    url: None,
                });
                entries.len() - 1
            }
        };
        match field {
            "path" => entries[index].path = Some(PathBuf::from(value)),
            "url" => entries[index].url = Some(value.to_string()),
            _ => {}
        }
    }
    entries
}
