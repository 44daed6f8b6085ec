//! Package records and the result shapes served to readers.
//!
//! # Overview
//!
//! - **PackageRecord**: normalized metadata parsed from one manifest file
//! - **PageRequest**: 1-indexed page selection shared by search and listing
//! - **SearchResult**: one page of records plus the total match count
//! - **SyncStats**: record count and last successful sync time
//!
//! Identity of a record is its identifier. Two records with the same
//! identifier describe the same package and the newer one wins.

mod page;
mod record;

pub use page::{PageRequest, SearchResult, SyncStats};
pub use record::PackageRecord;
