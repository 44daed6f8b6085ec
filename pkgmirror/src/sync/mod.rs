//! Repository synchronization.
//!
//! The [`SyncOrchestrator`] asks the mirror for changes, picks a full scan or
//! an incremental update, parses candidate files in bounded batches and
//! writes the results into the [`IndexStore`](crate::index::IndexStore).
//!
//! # Decision table
//!
//! ```text
//! store empty?  mirror says        action
//! ───────────── ────────────────── ─────────────────────────────
//! yes           anything           full scan
//! no            NoChanges          nothing (UpToDate)
//! no            Changed([])        nothing (UpToDate)
//! no            Changed(paths)     incremental update of paths
//! no            FreshClone         full scan
//! ```
//!
//! A full scan replaces the index wholesale, so manifests deleted upstream
//! disappear. An incremental update only upserts: records whose file was
//! deleted stay in the index until the next full scan.

mod error;
mod orchestrator;
mod scan;

pub use error::SyncError;
pub use orchestrator::{SyncOrchestrator, SyncOutcome};
pub use scan::scan_manifest_files;
