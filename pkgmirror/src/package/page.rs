//! Pagination and summary types.

use std::ops::Range;

use chrono::{DateTime, Utc};
use serde::Serialize;

use super::PackageRecord;

/// A 1-indexed page of `limit` items.
///
/// Page 0 is read as page 1. Pages past the end select nothing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub limit: usize,
}

impl PageRequest {
    /// Create a page request.
    pub fn new(page: usize, limit: usize) -> Self {
        Self {
            page: page.max(1),
            limit,
        }
    }

    /// Index range this page covers within a sequence of `total` items.
    ///
    /// # Example
    ///
    /// ```
    /// use pkgmirror::package::PageRequest;
    ///
    /// assert_eq!(PageRequest::new(2, 10).range(25), 10..20);
    /// assert_eq!(PageRequest::new(3, 10).range(25), 20..25);
    /// assert!(PageRequest::new(4, 10).range(25).is_empty());
    /// ```
    pub fn range(&self, total: usize) -> Range<usize> {
        let start = self.page.saturating_sub(1).saturating_mul(self.limit).min(total);
        let end = start.saturating_add(self.limit).min(total);
        start..end
    }
}

/// One page of packages.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SearchResult {
    /// Records on this page, in result order.
    pub packages: Vec<PackageRecord>,
    /// Number of records across all pages.
    pub total: usize,
    pub page: usize,
    pub limit: usize,
}

impl SearchResult {
    /// Cut one page out of an ordered sequence.
    pub fn paginate<I, R>(items: I, request: PageRequest) -> Self
    where
        I: ExactSizeIterator<Item = R>,
        R: AsRef<PackageRecord>,
    {
        let total = items.len();
        let range = request.range(total);
        let packages = items
            .skip(range.start)
            .take(range.len())
            .map(|r| r.as_ref().clone())
            .collect();

        Self {
            packages,
            total,
            page: request.page,
            limit: request.limit,
        }
    }
}

/// Index size and sync status.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncStats {
    pub total_packages: usize,
    /// Completion time of the last successful sync, `None` before the first.
    pub last_sync: Option<DateTime<Utc>>,
}

impl SyncStats {
    /// Whether a sync has ever completed.
    pub fn is_synced(&self) -> bool {
        self.last_sync.is_some()
    }
}
