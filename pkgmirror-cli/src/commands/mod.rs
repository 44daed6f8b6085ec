//! Command handlers.
//!
//! Every command builds a [`CliRunner`](crate::runner::CliRunner), brings
//! the index up with an initial sync and then does its own work.

pub mod query;
pub mod sync;
pub mod watch;

pub use query::{QueryArgs, SearchArgs};

use pkgmirror::package::{PackageRecord, SyncStats};
use pkgmirror::service::PackageService;
use pkgmirror::sync::SyncOutcome;

use crate::error::CliError;
use crate::runner::{CliRunner, ConfigOverrides};

/// Build the runner and service, then run the first sync.
fn start(overrides: &ConfigOverrides, command: &str) -> Result<(CliRunner, PackageService), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup(command);

    let service = runner.create_service();
    runner.runtime().block_on(service.initialize())?;
    Ok((runner, service))
}

fn describe_outcome(outcome: SyncOutcome) -> String {
    match outcome {
        SyncOutcome::FullScan { files, indexed } => {
            format!("Full scan: {} files, {} packages", files, indexed)
        }
        SyncOutcome::Incremental { files, indexed } => {
            format!("Incremental update: {} files, {} packages updated", files, indexed)
        }
        SyncOutcome::UpToDate => "Already up to date".to_string(),
        SyncOutcome::AlreadyRunning => "Sync already in progress".to_string(),
    }
}

fn describe_stats(stats: &SyncStats) -> String {
    let last_sync = stats
        .last_sync
        .map(|t| t.to_rfc3339())
        .unwrap_or_else(|| "never".to_string());
    format!("Packages:  {}\nLast sync: {}", stats.total_packages, last_sync)
}

fn describe_record(record: &PackageRecord) -> String {
    let mut lines = vec![
        format!("Id:        {}", record.id),
        format!("Name:      {}", record.name),
    ];
    if let Some(version) = &record.version {
        lines.push(format!("Version:   {}", version));
    }
    if let Some(publisher) = &record.publisher {
        lines.push(format!("Publisher: {}", publisher));
    }
    lines.push(format!("Updated:   {}", record.last_updated.to_rfc3339()));
    lines.join("\n")
}
