use std::process::Command;

use anyhow::{Context, Result, bail};
use tracing::{debug, info};

/// Creates hosted repositories for parents and workspaces.
pub trait RemoteProvider {
    /// Create an empty remote repository called `name` and return its clone URL.
    fn create_repository(&self, name: &str) -> Result<String>;
}

/// [`RemoteProvider`] backed by the GitHub CLI (`gh`).
#[derive(Debug, Clone)]
pub struct GhCli {
    /// Whether new repositories are private.
    pub private: bool,
}

impl Default for GhCli {
    fn default() -> Self {
        Self { private: true }
    }
}

impl RemoteProvider for GhCli {
    fn create_repository(&self, name: &str) -> Result<String> {
        let visibility = if self.private { "--private" } else { "--public" };
        debug!("gh repo create {name} {visibility}");
        let output = Command::new("gh")
            .args(["repo", "create", name, visibility])
            .output()
            .context("Failed to execute gh; is the GitHub CLI installed?")?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            bail!("gh repo create {name} failed: {}", stderr.trim());
        }

        let stdout = String::from_utf8_lossy(&output.stdout);
        let url = parse_repository_url(&stdout)
            .with_context(|| format!("gh repo create {name} printed no repository URL"))?;
        info!(name, url = %url, "created GitHub repository");
        Ok(url)
    }
}

/// Pick the repository URL out of `gh repo create` output, as a `.git` clone URL.
pub fn parse_repository_url(output: &str) -> Option<String> {
    output
        .split_whitespace()
        .find(|word| word.starts_with("https://") || word.starts_with("git@"))
        .map(|url| {
            let url = url.trim_end_matches('/');
            if url.ends_with(".git") {
                url.to_string()
            } else {
                format!("{url}.git")
            }
        })
}
