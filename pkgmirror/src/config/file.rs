//! Configuration file handling for `~/.pkgmirror/config.ini`.
//!
//! Loads user configuration with defaults for anything missing, then lets
//! environment variables override the repository settings.
//!
//! ```text
//! [repository]
//! url = https://github.com/microsoft/winget-pkgs.git
//! local_path = ~/.pkgmirror/repos/winget-pkgs
//! manifest_path = manifests
//! update_interval = */30 * * * *
//! parser = winget
//!
//! [search]
//! default_limit = 20
//! max_results = 100
//!
//! [sync]
//! batch_size = 500
//!
//! [logging]
//! directory = ~/.pkgmirror/logs
//! file = pkgmirror.log
//! ```

use std::path::{Path, PathBuf};

use ini::Ini;
use thiserror::Error;

use super::repo::{RepoConfig, SearchConfig, SyncConfig};

/// Environment variables that override `[repository]` keys.
pub const ENV_OVERRIDES: &[(&str, &str)] = &[
    ("REPO_URL", "url"),
    ("LOCAL_PATH", "local_path"),
    ("MANIFESTS_PATH", "manifest_path"),
    ("UPDATE_INTERVAL", "update_interval"),
    ("PARSER", "parser"),
];

/// Configuration file errors.
#[derive(Debug, Error)]
pub enum ConfigFileError {
    /// Failed to read or parse the config file
    #[error("Failed to read config file: {0}")]
    ReadError(#[from] ini::Error),

    /// Invalid configuration value
    #[error("Invalid configuration: {section}.{key} = '{value}' - {reason}")]
    InvalidValue {
        section: String,
        key: String,
        value: String,
        reason: String,
    },
}

impl ConfigFileError {
    fn invalid(section: &str, key: &str, value: &str, reason: impl ToString) -> Self {
        Self::InvalidValue {
            section: section.to_string(),
            key: key.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Log output location.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    pub directory: PathBuf,
    pub file: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            directory: config_directory().join("logs"),
            file: "pkgmirror.log".to_string(),
        }
    }
}

/// Everything read from the config file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConfigFile {
    pub repository: RepoConfig,
    pub search: SearchConfig,
    pub sync: SyncConfig,
    pub logging: LoggingConfig,
}

impl ConfigFile {
    /// Load configuration from the default path (~/.pkgmirror/config.ini).
    pub fn load() -> Result<Self, ConfigFileError> {
        Self::load_from(&config_file_path())
    }

    /// Load configuration from a specific path.
    ///
    /// If the file doesn't exist, returns defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigFileError> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let ini = Ini::load_from_file(path)?;
        parse_ini(&ini)
    }

    /// Parse configuration from INI text.
    pub fn from_ini_str(text: &str) -> Result<Self, ConfigFileError> {
        let ini = Ini::load_from_str(text).map_err(ini::Error::Parse)?;
        parse_ini(&ini)
    }

    /// Apply overrides from the process environment.
    pub fn with_env_overrides(self) -> Result<Self, ConfigFileError> {
        self.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from a variable lookup (see [`ENV_OVERRIDES`]).
    ///
    /// Empty values are ignored.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigFileError>
    where
        F: Fn(&str) -> Option<String>,
    {
        for (variable, key) in ENV_OVERRIDES {
            if let Some(value) = lookup(variable).filter(|v| !v.trim().is_empty()) {
                self.repository = apply_repository_key(self.repository, key, &value)?;
            }
        }
        Ok(self)
    }
}

/// Parse an `Ini` object into a `ConfigFile`.
///
/// Starts from `ConfigFile::default()` and overlays any values found.
fn parse_ini(ini: &Ini) -> Result<ConfigFile, ConfigFileError> {
    let mut config = ConfigFile::default();

    if let Some(section) = ini.section(Some("repository")) {
        for key in ["url", "local_path", "manifest_path", "update_interval", "parser"] {
            if let Some(v) = section.get(key) {
                config.repository = apply_repository_key(config.repository, key, v)?;
            }
        }
    }

    if let Some(section) = ini.section(Some("search")) {
        if let Some(v) = section.get("default_limit") {
            config.search.default_limit = parse_positive("search", "default_limit", v)?;
        }
        if let Some(v) = section.get("max_results") {
            config.search.max_results = parse_positive("search", "max_results", v)?;
        }
    }

    if let Some(section) = ini.section(Some("sync")) {
        if let Some(v) = section.get("batch_size") {
            config.sync = config
                .sync
                .with_batch_size(parse_positive("sync", "batch_size", v)?);
        }
    }

    if let Some(section) = ini.section(Some("logging")) {
        if let Some(v) = section.get("directory").map(str::trim) {
            if !v.is_empty() {
                config.logging.directory = expand_tilde(v);
            }
        }
        if let Some(v) = section.get("file").map(str::trim) {
            if !v.is_empty() {
                config.logging.file = v.to_string();
            }
        }
    }

    Ok(config)
}

fn apply_repository_key(
    repo: RepoConfig,
    key: &str,
    value: &str,
) -> Result<RepoConfig, ConfigFileError> {
    let v = value.trim();
    if v.is_empty() {
        return Ok(repo);
    }

    Ok(match key {
        "url" => repo.with_url(v),
        "local_path" => repo.with_local_path(expand_tilde(v)),
        "manifest_path" => repo.with_manifest_path(v),
        "update_interval" => repo.with_update_interval(
            v.parse()
                .map_err(|e| ConfigFileError::invalid("repository", key, v, e))?,
        ),
        "parser" => repo
            .with_parser_name(v)
            .map_err(|e| ConfigFileError::invalid("repository", key, v, e))?,
        _ => repo,
    })
}

fn parse_positive(section: &str, key: &str, value: &str) -> Result<usize, ConfigFileError> {
    match value.trim().parse::<usize>() {
        Ok(n) if n > 0 => Ok(n),
        _ => Err(ConfigFileError::invalid(
            section,
            key,
            value,
            "must be a positive integer",
        )),
    }
}

/// Expand a leading `~/` to the home directory.
fn expand_tilde(path: &str) -> PathBuf {
    match (path.strip_prefix("~/"), dirs::home_dir()) {
        (Some(rest), Some(home)) => home.join(rest),
        _ => PathBuf::from(path),
    }
}

/// Get the path to the config directory (~/.pkgmirror).
pub fn config_directory() -> PathBuf {
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".pkgmirror")
}

/// Get the path to the config file (~/.pkgmirror/config.ini).
pub fn config_file_path() -> PathBuf {
    config_directory().join("config.ini")
}
