//! Defines the custom error type for the `core` module.

use std::path::{Path, PathBuf};
use thiserror::Error;

/// The primary error type for the `core` module.
///
/// This enum encapsulates all possible errors that can occur while walking a
/// directory, loading file content, or operating on the node model.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The path handed to a walk or load does not exist on disk.
    #[error("Path does not exist: {0}")]
    PathDoesNotExist(PathBuf),

    /// Represents a path that was expected to be a directory but was not.
    #[error("Path is not a valid directory: {0}")]
    NotADirectory(PathBuf),

    /// Represents an I/O error while listing a directory or reading content.
    #[error("I/O error for path {1}: {0}")]
    Io(#[source] std::io::Error, PathBuf),

    /// A node operation was used on the wrong kind of node, or lazy content
    /// was read before it was materialized.
    #[error("Contract violation: {0}")]
    ContractViolation(&'static str),

    /// Represents an error that occurred when a Tokio task was joined.
    /// This is almost always a sub-walk that panicked.
    #[error("Task join error: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl CoreError {
    pub(crate) fn io(source: std::io::Error, path: &Path) -> Self {
        Self::Io(source, path.to_path_buf())
    }

    /// Returns true if the error is a failed disk read.
    pub fn is_read_failure(&self) -> bool {
        matches!(self, Self::Io(..))
    }
}

pub type CoreResult<T> = Result<T, CoreError>;
