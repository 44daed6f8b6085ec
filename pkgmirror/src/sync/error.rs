//! Sync error types.

use thiserror::Error;

use crate::mirror::MirrorError;

/// Errors that fail a sync attempt. The index is left as it was.
#[derive(Debug, Error)]
pub enum SyncError {
    /// The mirror could not clone or update.
    #[error("repository sync failed: {0}")]
    Mirror(#[from] MirrorError),

    /// A blocking sync step panicked or was cancelled.
    #[error("sync task failed: {0}")]
    Task(String),
}

impl From<tokio::task::JoinError> for SyncError {
    fn from(e: tokio::task::JoinError) -> Self {
        SyncError::Task(e.to_string())
    }
}
