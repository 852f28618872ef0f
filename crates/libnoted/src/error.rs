use std::{io, path::PathBuf, result::Result as StdResult};

use thiserror::Error;

/// Custom Result type for noted operations.
pub type Result<T> = StdResult<T, NotedError>;

/// Noted-specific error types
#[derive(Error, Debug)]
pub enum NotedError {
    /// The path is not inside any Git working tree.
    #[error("Not inside a git repository: {}", path.display())]
    NoRepository {
        /// Path the lookup started from.
        path: PathBuf,
    },

    /// No `.notedconfig` marker was found above the path.
    #[error("Not inside a noted repository: {} (run `noted init` first)", path.display())]
    NotInitialized {
        /// Path the lookup started from.
        path: PathBuf,
    },

    /// A `.notedconfig` marker already exists at the target.
    #[error("Already a noted repository: {}", path.display())]
    AlreadyInitialized {
        /// Root holding the existing marker.
        path: PathBuf,
    },

    /// A workspace operation failed due to an invalid state.
    #[error("Workspace '{name}': {message}")]
    WorkspaceError {
        /// Name of the workspace associated with the failure.
        name: String,
        /// Human-readable error description.
        message: String,
    },

    /// Git rejected a commit.
    #[error("Commit failed: {0}")]
    CommitFailed(String),

    /// Git rejected a push.
    #[error("Push failed: {0}")]
    PushFailed(String),

    /// Creating or wiring up a remote repository failed.
    #[error("Remote error: {0}")]
    RemoteError(String),

    /// The marker file could not be read or written.
    #[error("Config error: {0}")]
    ConfigError(String),

    /// The operation was cancelled by the user.
    #[error("Aborted by user")]
    UserAborted,

    /// A contextual precondition failed (e.g. note outside a workspace).
    #[error("Context error: {0}")]
    ContextError(String),

    /// A high-level operation failed.
    #[error("Operation failed: {0}")]
    OperationError(String),

    /// A git command failed.
    #[error("Git error: {0}")]
    GitError(String),

    /// An underlying I/O operation failed.
    #[error("IO error: {0}")]
    IoError(#[from] io::Error),
}

impl NotedError {
    /// Return the recommended process exit code for this error.
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::UserAborted => 130,
            Self::WorkspaceError { .. } => 2,
            Self::CommitFailed(_) | Self::PushFailed(_) => 3,
            Self::GitError(_) => 4,
            _ => 1,
        }
    }
}

/// Map git helper errors into a `NotedError::GitError`.
pub(crate) fn git_error(error: &anyhow::Error) -> NotedError {
    NotedError::GitError(format!("{error:#}"))
}
