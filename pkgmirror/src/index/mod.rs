//! In-memory package index.
//!
//! [`IndexStore`] owns the identifier → record mapping. Only the sync
//! orchestrator writes to it; [`QueryEngine`] serves read-only lookups,
//! searches and listings over the same store.
//!
//! Records are held behind `Arc` and replaced whole, so a reader racing a
//! sync sees either the old or the new record for a key, never a mix.

mod query;
mod store;

pub use query::{QueryEngine, MIN_QUERY_LEN};
pub use store::IndexStore;
