//! CLI error handling with user-friendly messages.
//!
//! Centralizes error handling for the CLI, providing consistent formatting
//! and the exit code.

use std::fmt;
use std::io;
use std::process;

use pkgmirror::config::ConfigFileError;
use pkgmirror::parser::ParserError;
use pkgmirror::sync::SyncError;

/// CLI-specific errors with user-friendly messages.
#[derive(Debug)]
pub enum CliError {
    /// Failed to initialize logging
    LoggingInit(String),
    /// Configuration error
    Config(String),
    /// Failed to start the async runtime
    Runtime(io::Error),
    /// Initial or scheduled sync failed
    Sync(SyncError),
    /// Query rejected before reaching the index
    InvalidQuery(String),
    /// No package with the requested identifier
    NotFound(String),
    /// Failed to render JSON output
    Output(serde_json::Error),
}

impl CliError {
    /// Exit the process with an appropriate error message and code.
    pub fn exit(&self) -> ! {
        eprintln!("Error: {}", self);

        if let CliError::Sync(SyncError::Mirror(_)) = self {
            eprintln!();
            eprintln!("Common issues:");
            eprintln!("  1. Repository URL unreachable: check --repo-url or REPO_URL");
            eprintln!("  2. Local path not writable: check --local-path or LOCAL_PATH");
            eprintln!("  3. Checkout corrupted: remove the local path and sync again");
        }

        process::exit(1)
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::LoggingInit(msg) => write!(f, "Failed to initialize logging: {}", msg),
            CliError::Config(msg) => write!(f, "Configuration error: {}", msg),
            CliError::Runtime(e) => write!(f, "Failed to start runtime: {}", e),
            CliError::Sync(e) => write!(f, "{}", e),
            CliError::InvalidQuery(msg) => write!(f, "Invalid query: {}", msg),
            CliError::NotFound(id) => write!(f, "package not found: {}", id),
            CliError::Output(e) => write!(f, "Failed to render output: {}", e),
        }
    }
}

impl std::error::Error for CliError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            CliError::Runtime(e) => Some(e),
            CliError::Sync(e) => Some(e),
            CliError::Output(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ConfigFileError> for CliError {
    fn from(e: ConfigFileError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<ParserError> for CliError {
    fn from(e: ParserError) -> Self {
        CliError::Config(e.to_string())
    }
}

impl From<SyncError> for CliError {
    fn from(e: SyncError) -> Self {
        CliError::Sync(e)
    }
}

impl From<serde_json::Error> for CliError {
    fn from(e: serde_json::Error) -> Self {
        CliError::Output(e)
    }
}
