//! Error types for mirror operations.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that abort a clone or update.
#[derive(Debug, Error)]
pub enum MirrorError {
    /// Cloning the remote failed.
    #[error("failed to clone {url}: {source}")]
    Clone { url: String, source: git2::Error },

    /// Opening, fetching or checking out the existing checkout failed.
    #[error("failed to update {}: {source}", .path.display())]
    Update { path: PathBuf, source: git2::Error },

    /// Preparing the checkout location failed.
    #[error("failed to prepare {}: {source}", .path.display())]
    Io { path: PathBuf, source: io::Error },
}
