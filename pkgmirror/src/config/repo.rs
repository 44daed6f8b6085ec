//! Repository, search and sync settings.

use std::path::{Path, PathBuf};

use super::interval::RefreshInterval;
use crate::package::PageRequest;
use crate::parser::{ParserError, ParserFormat};

/// Default upstream repository.
pub const DEFAULT_REPO_URL: &str = "https://github.com/microsoft/winget-pkgs.git";

/// Default location of the local checkout.
pub const DEFAULT_LOCAL_PATH: &str = "./repos/winget-pkgs";

/// Default manifest subdirectory within the checkout.
pub const DEFAULT_MANIFEST_PATH: &str = "manifests";

/// Default number of files parsed concurrently.
pub const DEFAULT_BATCH_SIZE: usize = 500;

/// Default page size for search and listing.
pub const DEFAULT_SEARCH_LIMIT: usize = 20;

/// Upper bound on page size.
pub const DEFAULT_MAX_RESULTS: usize = 100;

/// Where the manifests come from and how to read them.
///
/// Settings are fixed once built; the `with_*` methods consume and return
/// the config so it can be assembled step by step.
///
/// # Example
///
/// ```
/// use std::path::Path;
/// use pkgmirror::config::RepoConfig;
///
/// let config = RepoConfig::new("https://example.com/pkgs.git", "/srv/pkgs")
///     .with_manifest_path("manifests")
///     .with_parser_name("winget")
///     .unwrap();
///
/// assert_eq!(config.manifest_path(), Path::new("manifests"));
/// assert!(config.clone().with_parser_name("nuget").is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoConfig {
    url: String,
    local_path: PathBuf,
    manifest_path: PathBuf,
    update_interval: RefreshInterval,
    parser: ParserFormat,
}

impl Default for RepoConfig {
    fn default() -> Self {
        Self::new(DEFAULT_REPO_URL, DEFAULT_LOCAL_PATH)
    }
}

impl RepoConfig {
    /// Create a config for `url` mirrored at `local_path`.
    pub fn new(url: impl Into<String>, local_path: impl Into<PathBuf>) -> Self {
        Self {
            url: url.into(),
            local_path: local_path.into(),
            manifest_path: PathBuf::from(DEFAULT_MANIFEST_PATH),
            update_interval: RefreshInterval::default(),
            parser: ParserFormat::default(),
        }
    }

    /// Set the remote URL.
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = url.into();
        self
    }

    /// Set the local checkout path.
    pub fn with_local_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.local_path = path.into();
        self
    }

    /// Set the manifest subdirectory, relative to the checkout.
    pub fn with_manifest_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.manifest_path = path.into();
        self
    }

    /// Set the refresh interval.
    pub fn with_update_interval(mut self, interval: RefreshInterval) -> Self {
        self.update_interval = interval;
        self
    }

    /// Set the parser format.
    pub fn with_parser(mut self, parser: ParserFormat) -> Self {
        self.parser = parser;
        self
    }

    /// Set the parser format by name, failing on unknown formats.
    pub fn with_parser_name(self, name: &str) -> Result<Self, ParserError> {
        Ok(self.with_parser(name.parse()?))
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn local_path(&self) -> &Path {
        &self.local_path
    }

    pub fn manifest_path(&self) -> &Path {
        &self.manifest_path
    }

    pub fn update_interval(&self) -> &RefreshInterval {
        &self.update_interval
    }

    pub fn parser(&self) -> ParserFormat {
        self.parser
    }
}

/// Page size limits for readers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SearchConfig {
    /// Page size used when the caller gives none.
    pub default_limit: usize,
    /// Largest page size a caller may ask for.
    pub max_results: usize,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_SEARCH_LIMIT,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

impl SearchConfig {
    /// Build a page request, applying the default and the cap.
    ///
    /// ```
    /// use pkgmirror::config::SearchConfig;
    ///
    /// let search = SearchConfig::default();
    /// assert_eq!(search.page_request(1, None).limit, 20);
    /// assert_eq!(search.page_request(1, Some(1000)).limit, 100);
    /// ```
    pub fn page_request(&self, page: usize, limit: Option<usize>) -> PageRequest {
        let limit = match limit {
            Some(0) | None => self.default_limit,
            Some(n) => n,
        };
        PageRequest::new(page, limit.min(self.max_results))
    }
}

/// Sync tuning.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SyncConfig {
    /// Files parsed concurrently per batch. Batches run one after another.
    pub batch_size: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            batch_size: DEFAULT_BATCH_SIZE,
        }
    }
}

impl SyncConfig {
    /// Set the batch size. Zero is raised to one.
    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }
}
