//! CLI runner for common setup.
//!
//! Resolves configuration, initializes logging and owns the async runtime
//! so command handlers only deal with the service.

use std::path::PathBuf;

use tokio::runtime::Runtime;
use tracing::info;

use pkgmirror::config::{ConfigFile, RepoConfig};
use pkgmirror::logging::{init_logging, LoggingGuard};
use pkgmirror::service::PackageService;

use crate::error::CliError;

/// Settings given on the command line. Each one overrides file and env.
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub config: Option<PathBuf>,
    pub repo_url: Option<String>,
    pub local_path: Option<PathBuf>,
    pub manifest_path: Option<PathBuf>,
    pub parser: Option<String>,
}

/// Runner that manages CLI lifecycle and common operations.
pub struct CliRunner {
    #[allow(dead_code)]
    logging_guard: LoggingGuard,
    config: ConfigFile,
    runtime: Runtime,
}

impl CliRunner {
    /// Load config, initialize logging and build the runtime.
    pub fn new(overrides: &ConfigOverrides) -> Result<Self, CliError> {
        let config = resolve_config(overrides)?;

        let logging_guard = init_logging(&config.logging.directory, &config.logging.file)
            .map_err(|e| CliError::LoggingInit(e.to_string()))?;

        let runtime = tokio::runtime::Builder::new_multi_thread()
            .enable_all()
            .thread_name("pkgmirror")
            .build()
            .map_err(CliError::Runtime)?;

        Ok(Self {
            logging_guard,
            config,
            runtime,
        })
    }

    pub fn config(&self) -> &ConfigFile {
        &self.config
    }

    pub fn runtime(&self) -> &Runtime {
        &self.runtime
    }

    /// Log startup information for a command.
    pub fn log_startup(&self, command: &str) {
        let repo = &self.config.repository;
        info!("pkgmirror v{}", env!("CARGO_PKG_VERSION"));
        info!(
            command,
            url = %repo.url(),
            local_path = %repo.local_path().display(),
            parser = %repo.parser(),
            interval = repo.update_interval().expression(),
            "Starting"
        );
    }

    pub fn create_service(&self) -> PackageService {
        PackageService::from_config_file(&self.config)
    }
}

/// Config file, then environment, then command-line flags.
pub fn resolve_config(overrides: &ConfigOverrides) -> Result<ConfigFile, CliError> {
    let config = match &overrides.config {
        Some(path) => ConfigFile::load_from(path)?,
        None => ConfigFile::load()?,
    };
    let mut config = config.with_env_overrides()?;
    config.repository = apply_flags(config.repository, overrides)?;
    Ok(config)
}

fn apply_flags(mut repo: RepoConfig, overrides: &ConfigOverrides) -> Result<RepoConfig, CliError> {
    if let Some(url) = &overrides.repo_url {
        repo = repo.with_url(url.as_str());
    }
    if let Some(path) = &overrides.local_path {
        repo = repo.with_local_path(path.as_path());
    }
    if let Some(path) = &overrides.manifest_path {
        repo = repo.with_manifest_path(path.as_path());
    }
    if let Some(name) = &overrides.parser {
        repo = repo.with_parser_name(name)?;
    }
    Ok(repo)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::Path;
    use tempfile::TempDir;

    #[test]
    fn test_flags_override_config_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("config.ini");
        fs::write(
            &path,
            "[repository]\nurl = https://example.com/file.git\nlocal_path = /srv/file\n",
        )
        .unwrap();

        let file = ConfigFile::load_from(&path).unwrap();
        let repo = apply_flags(
            file.repository,
            &ConfigOverrides {
                repo_url: Some("https://example.com/flag.git".to_string()),
                manifest_path: Some(PathBuf::from("pkgs")),
                ..Default::default()
            },
        )
        .unwrap();

        assert_eq!(repo.url(), "https://example.com/flag.git");
        assert_eq!(repo.local_path(), Path::new("/srv/file"));
        assert_eq!(repo.manifest_path(), Path::new("pkgs"));
    }

    #[test]
    fn test_unknown_parser_flag_is_config_error() {
        let err = apply_flags(
            RepoConfig::default(),
            &ConfigOverrides {
                parser: Some("nuget".to_string()),
                ..Default::default()
            },
        )
        .unwrap_err();

        assert!(matches!(err, CliError::Config(_)));
    }
}
