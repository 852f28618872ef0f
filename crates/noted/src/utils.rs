use std::{
    env,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use libnoted::DEFAULT_BRANCH;

/// Environment variable overriding the default branch.
pub const BRANCH_ENV: &str = "NOTED_BRANCH";

/// Expand a leading `~` in a filesystem path using the `HOME` environment variable.
pub fn expand_tilde(path: &str) -> PathBuf {
    if path.starts_with("~")
        && let Ok(home) = env::var("HOME")
    {
        return PathBuf::from(path.replacen("~", &home, 1));
    }
    PathBuf::from(path)
}

/// Resolve the branch (priority: CLI flag > env var > default).
pub fn resolve_branch(flag: Option<&str>) -> String {
    choose_branch(flag, env::var(BRANCH_ENV).ok())
}

/// Pick the first non-empty branch of `flag` and `env_value`, or the default.
fn choose_branch(flag: Option<&str>, env_value: Option<String>) -> String {
    flag.map(str::to_string)
        .or(env_value)
        .filter(|branch| !branch.trim().is_empty())
        .unwrap_or_else(|| DEFAULT_BRANCH.to_string())
}

/// Resolve the directory commands operate on: `--path` if given, else the working directory.
pub fn resolve_base_dir(flag: Option<&str>) -> Result<PathBuf> {
    match flag {
        Some(path) => Ok(expand_tilde(path)),
        None => env::current_dir().context("Failed to get current directory"),
    }
}

/// Resolve an optional command argument against `base`.
pub fn resolve_target(base: &Path, target: Option<&str>) -> PathBuf {
    match target {
        Some(target) => base.join(expand_tilde(target)),
        None => base.to_path_buf(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn branch_precedence() {
        assert_eq!(choose_branch(Some("flag"), Some("env".into())), "flag");
        assert_eq!(choose_branch(None, Some("env".into())), "env");
        assert_eq!(choose_branch(None, None), DEFAULT_BRANCH);
        assert_eq!(choose_branch(None, Some(" ".into())), DEFAULT_BRANCH);
    }

    #[test]
    fn targets_resolve_against_base() {
        let base = PathBuf::from("/notes");
        assert_eq!(resolve_target(&base, None), base);
        assert_eq!(resolve_target(&base, Some("work")), PathBuf::from("/notes/work"));
        assert_eq!(resolve_target(&base, Some("/abs")), PathBuf::from("/abs"));
    }
}
