//! Read-only queries over the index.

use std::sync::Arc;

use crate::package::{PackageRecord, PageRequest, SearchResult};

use super::IndexStore;

/// Shortest query a transport should forward. The engine accepts shorter ones.
pub const MIN_QUERY_LEN: usize = 2;

/// Lookup, search and listing over an [`IndexStore`].
#[derive(Clone)]
pub struct QueryEngine {
    store: Arc<IndexStore>,
}

impl QueryEngine {
    pub fn new(store: Arc<IndexStore>) -> Self {
        Self { store }
    }

    /// Exact identifier lookup.
    pub fn get(&self, id: &str) -> Option<PackageRecord> {
        self.store.get(id).map(|record| record.as_ref().clone())
    }

    /// Case-insensitive substring search over name and identifier.
    ///
    /// Ranking: an exact (case-insensitive) name match comes first, then
    /// shorter names before longer ones. Equal ranks keep insertion order.
    pub fn search(&self, query: &str, request: PageRequest) -> SearchResult {
        let needle = query.to_lowercase();

        let mut matches: Vec<(bool, usize, Arc<PackageRecord>)> = self
            .store
            .snapshot()
            .into_iter()
            .filter_map(|record| {
                let name = record.name.to_lowercase();
                if name.contains(&needle) || record.id.to_lowercase().contains(&needle) {
                    let inexact = name != needle;
                    let length = record.name.chars().count();
                    Some((inexact, length, record))
                } else {
                    None
                }
            })
            .collect();

        // Stable: ties stay in insertion order.
        matches.sort_by_key(|(inexact, length, _)| (*inexact, *length));

        SearchResult::paginate(matches.into_iter().map(|(_, _, record)| record), request)
    }

    /// All records in insertion order, unranked.
    pub fn list(&self, request: PageRequest) -> SearchResult {
        SearchResult::paginate(self.store.snapshot().into_iter(), request)
    }

    pub fn count(&self) -> usize {
        self.store.len()
    }
}
