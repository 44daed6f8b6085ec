//! Package service facade.
//!
//! [`PackageService`] wires a mirror, a sync orchestrator and a query engine
//! together over one shared index, and applies the configured page limits
//! to reader requests. Transports (the CLI, a future HTTP layer) talk only
//! to this type.
//!
//! # Example
//!
//! ```ignore
//! use pkgmirror::config::ConfigFile;
//! use pkgmirror::service::PackageService;
//!
//! let service = PackageService::from_config_file(&ConfigFile::load()?);
//! service.initialize().await?;
//!
//! let result = service.search_packages("firefox", 1, None);
//! println!("{} matches", result.total);
//! ```

use std::sync::Arc;

use crate::config::{ConfigFile, RepoConfig, SearchConfig, SyncConfig};
use crate::index::{IndexStore, QueryEngine};
use crate::mirror::{GitMirror, Mirror};
use crate::package::{PackageRecord, SearchResult, SyncStats};
use crate::sync::{SyncError, SyncOrchestrator, SyncOutcome};

/// Sync and query operations over one package index.
pub struct PackageService {
    orchestrator: SyncOrchestrator,
    engine: QueryEngine,
    search: SearchConfig,
}

impl PackageService {
    /// Create a service mirroring the configured git repository.
    pub fn new(repo: RepoConfig, search: SearchConfig, sync: SyncConfig) -> Self {
        let mirror = Arc::new(GitMirror::from_config(&repo));
        Self::with_mirror(repo, search, sync, mirror)
    }

    /// Create a service over any mirror implementation.
    pub fn with_mirror(
        repo: RepoConfig,
        search: SearchConfig,
        sync: SyncConfig,
        mirror: Arc<dyn Mirror>,
    ) -> Self {
        let store = Arc::new(IndexStore::new());
        let engine = QueryEngine::new(Arc::clone(&store));
        let orchestrator = SyncOrchestrator::new(repo, sync, mirror, store);
        Self {
            orchestrator,
            engine,
            search,
        }
    }

    /// Create a service from a loaded config file.
    pub fn from_config_file(config: &ConfigFile) -> Self {
        Self::new(config.repository.clone(), config.search, config.sync)
    }

    pub fn config(&self) -> &RepoConfig {
        self.orchestrator.config()
    }

    /// First sync. Fails if the mirror cannot be brought up.
    pub async fn initialize(&self) -> Result<SyncOutcome, SyncError> {
        self.orchestrator.initialize().await
    }

    /// Sync with upstream unless a sync is already running.
    pub async fn sync_repository(&self) -> Result<SyncOutcome, SyncError> {
        self.orchestrator.sync_repository().await
    }

    /// Exact identifier lookup.
    pub fn get_package(&self, id: &str) -> Option<PackageRecord> {
        self.engine.get(id)
    }

    /// Ranked search. `limit` falls back to the default and is capped.
    pub fn search_packages(&self, query: &str, page: usize, limit: Option<usize>) -> SearchResult {
        self.engine
            .search(query, self.search.page_request(page, limit))
    }

    /// Unranked listing in insertion order.
    pub fn list_packages(&self, page: usize, limit: Option<usize>) -> SearchResult {
        self.engine.list(self.search.page_request(page, limit))
    }

    pub fn get_stats(&self) -> SyncStats {
        self.orchestrator.stats()
    }
}
