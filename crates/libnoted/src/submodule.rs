use std::path::{Path, PathBuf};

use tracing::debug;

use crate::git;

/// Result of asking git whether a repository is a submodule.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SuperprojectProbe {
    /// The repository is registered in the superproject rooted at this path.
    Superproject(PathBuf),
    /// Git answered and the repository has no superproject.
    NotSubmodule,
    /// The query itself failed.
    Inconclusive(String),
}

impl SuperprojectProbe {
    /// Collapse the probe, treating an inconclusive query as "not a submodule".
    pub fn into_superproject(self) -> Option<PathBuf> {
        match self {
            Self::Superproject(path) => Some(path),
            Self::NotSubmodule => None,
            Self::Inconclusive(detail) => {
                debug!(%detail, "superproject detection inconclusive, assuming none");
                None
            }
        }
    }
}

/// Ask git once for the superproject working tree of `repo_root`.
pub fn probe_superproject(repo_root: &Path) -> SuperprojectProbe {
    match git::superproject_working_tree(repo_root) {
        Ok(Some(path)) => SuperprojectProbe::Superproject(path),
        Ok(None) => SuperprojectProbe::NotSubmodule,
        Err(err) => SuperprojectProbe::Inconclusive(format!("{err:#}")),
    }
}

/// Return the superproject root of `repo_root`, or `None` when it is not a
/// submodule or the query fails.
pub fn find_superproject_root(repo_root: &Path) -> Option<PathBuf> {
    probe_superproject(repo_root).into_superproject()
}
