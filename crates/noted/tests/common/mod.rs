#![allow(dead_code)]

use std::{
    fs,
    path::{Path, PathBuf},
    process::{Command, Output},
};

use anyhow::{Context, Result, ensure};

/// Identity used for every commit made during tests.
const IDENTITY: [(&str, &str); 4] = [
    ("GIT_AUTHOR_NAME", "Test User"),
    ("GIT_AUTHOR_EMAIL", "test@example.com"),
    ("GIT_COMMITTER_NAME", "Test User"),
    ("GIT_COMMITTER_EMAIL", "test@example.com"),
];

/// Return the path to the compiled `noted` binary for integration-style tests.
pub fn noted_binary() -> PathBuf {
    PathBuf::from(env!("CARGO_BIN_EXE_noted"))
}

/// Run a git command inside `repo_path`, ensuring it succeeds.
pub fn git(repo_path: &Path, args: &[&str]) -> Result<Output> {
    let output = Command::new("git")
        .current_dir(repo_path)
        .envs(IDENTITY)
        .args(args)
        .output()
        .with_context(|| format!("failed to run git {}", args.join(" ")))?;

    ensure!(
        output.status.success(),
        "git command failed: git {}\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );

    Ok(output)
}

/// Trimmed stdout of a successful git command.
pub fn git_stdout(repo_path: &Path, args: &[&str]) -> Result<String> {
    let output = git(repo_path, args)?;
    Ok(String::from_utf8_lossy(&output.stdout).trim().to_string())
}

/// Subject line of the latest commit in `repo_path`.
pub fn head_subject(repo_path: &Path) -> Result<String> {
    git_stdout(repo_path, &["log", "-1", "--format=%s"])
}

/// Number of commits reachable from HEAD.
pub fn commit_count(repo_path: &Path) -> Result<usize> {
    Ok(git_stdout(repo_path, &["rev-list", "--count", "HEAD"])?.parse()?)
}

/// Whether `git status` reports nothing to commit.
pub fn is_clean(repo_path: &Path) -> Result<bool> {
    Ok(git_stdout(repo_path, &["status", "--porcelain"])?.is_empty())
}

/// Create an empty bare repository to push to.
pub fn bare_remote(dir: &Path, name: &str) -> Result<PathBuf> {
    let path = dir.join(format!("{name}.git"));
    fs::create_dir_all(&path)?;
    git(&path, &["init", "--bare", "--quiet"])?;
    Ok(path)
}

/// Prepare a `Command` configured to run `noted` in `dir`.
pub fn noted_command(dir: &Path) -> Command {
    let mut cmd = Command::new(noted_binary());
    cmd.current_dir(dir);
    cmd.envs(IDENTITY);
    cmd.env_remove("NOTED_BRANCH");
    cmd.env_remove("NOTED_LOG");
    cmd.arg("--no-color");
    cmd
}

/// Run `noted` with the provided arguments, returning the command output.
pub fn run_noted(dir: &Path, args: &[&str]) -> Result<Output> {
    noted_command(dir)
        .args(args)
        .output()
        .with_context(|| format!("failed to run noted {}", args.join(" ")))
}

/// Run `noted` and fail with its output when it exits unsuccessfully.
pub fn run_noted_ok(dir: &Path, args: &[&str]) -> Result<String> {
    let output = run_noted(dir, args)?;
    ensure!(
        output.status.success(),
        "noted {} failed\nstdout: {}\nstderr: {}",
        args.join(" "),
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    );
    Ok(String::from_utf8_lossy(&output.stdout).to_string())
}

/// Create a local parent repository called `notes` inside `dir`.
pub fn init_parent(dir: &Path) -> Result<PathBuf> {
    run_noted_ok(dir, &["init", "notes", "--remote", "local"])?;
    Ok(fs::canonicalize(dir.join("notes"))?)
}

/// Create a local parent repository with a workspace called `work`.
pub fn parent_with_workspace(dir: &Path) -> Result<(PathBuf, PathBuf)> {
    let root = init_parent(dir)?;
    run_noted_ok(&root, &["workspace", "add", "work"])?;
    Ok((root.clone(), root.join("work")))
}
