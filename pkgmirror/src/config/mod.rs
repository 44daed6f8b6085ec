//! Configuration types for pkgmirror.
//!
//! - [`RepoConfig`]: upstream URL, local checkout, manifest directory,
//!   refresh interval and parser format
//! - [`SearchConfig`] / [`SyncConfig`]: reader page limits and sync batching
//! - [`ConfigFile`]: all of the above loaded from `~/.pkgmirror/config.ini`
//!
//! ```
//! use pkgmirror::config::ConfigFile;
//!
//! let config = ConfigFile::from_ini_str("[sync]\nbatch_size = 100\n").unwrap();
//! assert_eq!(config.sync.batch_size, 100);
//! assert_eq!(config.repository.manifest_path().to_str(), Some("manifests"));
//! ```

mod file;
mod interval;
mod repo;

pub use file::{
    config_directory, config_file_path, ConfigFile, ConfigFileError, LoggingConfig,
    ENV_OVERRIDES,
};
pub use interval::{IntervalParseError, RefreshInterval, DEFAULT_UPDATE_INTERVAL};
pub use repo::{
    RepoConfig, SearchConfig, SyncConfig, DEFAULT_BATCH_SIZE, DEFAULT_LOCAL_PATH,
    DEFAULT_MANIFEST_PATH, DEFAULT_MAX_RESULTS, DEFAULT_REPO_URL, DEFAULT_SEARCH_LIMIT,
};
