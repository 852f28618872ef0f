#![deny(missing_docs)]
#![deny(rustdoc::missing_crate_level_docs)]
//! Core library for noted: Markdown notes kept in Git, organised as a parent
//! repository whose workspaces are Git submodules.
//!
//! The central operation is [`propagate_commit`], which commits a path in its
//! repository and then records the updated submodule pointer in every
//! superproject above it. [`Noted`] builds the workspace, folder, and note
//! workflows on top of it. The CLI binary in `crates/noted` drives this
//! library.

/// Error type and exit-code mapping.
mod error;
/// Helper routines for interacting with Git repositories.
mod git;
/// Ancestor walks for repository and parent roots.
mod locate;
/// The `.notedconfig` marker file.
mod marker;
/// Name validation and collision avoidance.
mod names;
/// High-level orchestration of parents, workspaces, folders, and notes.
mod noted;
/// Commit propagation through superprojects.
mod propagate;
/// Push decisions and execution.
mod push;
/// Hosted repository creation.
mod remote;
/// Superproject detection.
mod submodule;
/// Initial file contents.
pub mod templates;
/// Outcome and status types shared by the operations.
mod types;

pub use error::{NotedError, Result};
pub use locate::{
    find_ancestor, find_repository_root, find_workspace_tool_root, relative_pathspec,
};
pub use marker::{MARKER_FILE, NotedConfig, ParentType, RemoteType};
pub use names::{next_available_name, validate_name};
/// Re-export of the main manager type.
pub use noted::Noted;
pub use propagate::{CommitRequest, DEFAULT_BRANCH, ensure_branch, propagate_commit};
pub use push::{ORIGIN, change_status, push_repository};
pub use remote::{GhCli, RemoteProvider};
pub use submodule::{SuperprojectProbe, find_superproject_root, probe_superproject};
pub use types::{
    ChangeStatus, CommitOutcome, CreatedEntry, InitReport, RemoteChoice, RepoChangeStatus,
    RepoOutcome, RepoStatus, UploadOutcome, WorkspaceInfo,
};
