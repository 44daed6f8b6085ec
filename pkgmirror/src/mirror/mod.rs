//! Local mirror of the upstream manifest repository.
//!
//! The mirror is the only component that talks to the remote. Each call to
//! [`Mirror::clone_or_update`] brings the checkout up to date and reports
//! what happened with an explicit [`MirrorUpdate`]:
//!
//! ```text
//! no checkout ──► clone ─────────────────────────► FreshClone
//! checkout ─────► fetch ──► same commit ─────────► NoChanges
//!                      └──► new commits ──► diff ─► Changed(paths)
//!                                          └ diff failed ► FreshClone
//! ```
//!
//! Mirror calls block on network and disk. Async callers run them on the
//! blocking pool.

mod error;
mod git;

use std::path::{Path, PathBuf};

pub use error::MirrorError;
pub use git::GitMirror;

/// Outcome of a clone-or-update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MirrorUpdate {
    /// Checkout was already at the upstream head.
    NoChanges,

    /// Upstream moved. Paths are relative to the checkout root, limited to
    /// the manifest directory, and include deleted files. May be empty when
    /// none of the new commits touch manifests.
    Changed(Vec<PathBuf>),

    /// The checkout was created just now, or its history could not be
    /// compared. Nothing is known about individual files.
    FreshClone,
}

/// Clone-if-absent, else pull.
pub trait Mirror: Send + Sync {
    /// Root of the local checkout.
    fn local_path(&self) -> &Path;

    /// Bring the checkout up to date and report what changed.
    fn clone_or_update(&self) -> Result<MirrorUpdate, MirrorError>;
}
