use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// File name of the marker that identifies a noted parent repository.
pub const MARKER_FILE: &str = ".notedconfig";

/// Where the parent repository lives.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ParentType {
    /// Only on this machine.
    Local,
    /// Mirrored to a remote named `origin`.
    Remote,
}

/// How the remote of a parent repository was provisioned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RemoteType {
    /// Created through the GitHub CLI.
    Github,
    /// Supplied by the user as a plain URL.
    Url,
}

/// Contents of the `.notedconfig` marker file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotedConfig {
    /// Whether the parent repository has a remote.
    pub parent_type: ParentType,
    /// Kind of remote, when there is one.
    pub remote_type: Option<RemoteType>,
    /// URL of the `origin` remote, when there is one.
    pub remote_url: Option<String>,
    /// Creation time of the parent repository.
    #[serde(rename = "createdAt")]
    pub created_at: DateTime<Utc>,
}

impl NotedConfig {
    /// Config for a parent repository without a remote.
    pub fn local() -> Self {
        Self {
            parent_type: ParentType::Local,
            remote_type: None,
            remote_url: None,
            created_at: Utc::now(),
        }
    }

    /// Config for a parent repository pushed to `url`.
    pub fn remote(remote_type: RemoteType, url: &str) -> Self {
        Self {
            parent_type: ParentType::Remote,
            remote_type: Some(remote_type),
            remote_url: Some(url.to_string()),
            created_at: Utc::now(),
        }
    }

    /// Path of the marker file inside `root`.
    pub fn path(root: &Path) -> PathBuf {
        root.join(MARKER_FILE)
    }

    /// Read the marker stored in `root`.
    pub fn read(root: &Path) -> Result<Self> {
        let path = Self::path(root);
        let contents = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read {}", path.display()))?;
        serde_json::from_str(&contents)
            .with_context(|| format!("Failed to parse {}", path.display()))
    }

    /// Write the marker into `root`, replacing any existing one.
    pub fn write(&self, root: &Path) -> Result<()> {
        let path = Self::path(root);
        let mut encoded =
            serde_json::to_string_pretty(self).context("Failed to encode noted config")?;
        encoded.push('\n');
        fs::write(&path, encoded)
            .with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::Value;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn marker_uses_documented_field_names() {
        let config = NotedConfig::remote(RemoteType::Github, "https://github.com/me/notes");
        let value: Value = serde_json::to_value(&config).unwrap();

        assert_eq!(value["parent_type"], "remote");
        assert_eq!(value["remote_type"], "github");
        assert_eq!(value["remote_url"], "https://github.com/me/notes");
        assert!(value["createdAt"].is_string());
    }

    #[test]
    fn local_marker_serializes_nulls() {
        let value: Value = serde_json::to_value(NotedConfig::local()).unwrap();

        assert_eq!(value["parent_type"], "local");
        assert!(value["remote_type"].is_null());
        assert!(value["remote_url"].is_null());
    }

    #[test]
    fn marker_written_to_disk_reads_back() {
        let tmp = tempdir().unwrap();
        let config = NotedConfig::remote(RemoteType::Url, "git@example.com:notes.git");

        config.write(tmp.path()).unwrap();
        assert!(tmp.path().join(MARKER_FILE).is_file());
        assert_eq!(NotedConfig::read(tmp.path()).unwrap(), config);
    }

    #[test]
    fn marker_accepts_iso_timestamps() {
        let raw = r#"{
            "parent_type": "local",
            "remote_type": null,
            "remote_url": null,
            "createdAt": "2024-05-01T12:30:00.000Z"
        }"#;
        let config: NotedConfig = serde_json::from_str(raw).unwrap();

        assert_eq!(config.parent_type, ParentType::Local);
        assert_eq!(config.created_at.to_rfc3339(), "2024-05-01T12:30:00+00:00");
    }

    #[test]
    fn missing_marker_is_an_error() {
        let tmp = tempdir().unwrap();
        assert!(NotedConfig::read(tmp.path()).is_err());
    }
}
