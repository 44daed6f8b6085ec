//! Watch command - keep the index in sync on the refresh interval.

use std::sync::Arc;

use tokio::sync::Notify;
use tokio::time::MissedTickBehavior;
use tracing::{error, info};

use super::{describe_outcome, start};
use crate::error::CliError;
use crate::runner::ConfigOverrides;

pub fn run(overrides: &ConfigOverrides) -> Result<(), CliError> {
    let (runner, service) = start(overrides, "watch")?;
    let interval = runner.config().repository.update_interval().clone();

    let shutdown = Arc::new(Notify::new());
    let handler_shutdown = Arc::clone(&shutdown);
    ctrlc::set_handler(move || handler_shutdown.notify_one())
        .map_err(|e| CliError::Config(format!("failed to install Ctrl-C handler: {}", e)))?;

    println!(
        "Watching {} every {} ({} packages). Press Ctrl-C to stop.",
        service.config().url(),
        interval,
        service.get_stats().total_packages
    );

    runner.runtime().block_on(async {
        let mut ticker = tokio::time::interval(interval.period());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // First tick fires immediately; the initial sync already ran.
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = shutdown.notified() => {
                    info!("Shutdown requested");
                    break;
                }
                _ = ticker.tick() => match service.sync_repository().await {
                    Ok(outcome) => info!(
                        packages = service.get_stats().total_packages,
                        "{}",
                        describe_outcome(outcome)
                    ),
                    Err(e) => error!(error = %e, "Scheduled sync failed"),
                },
            }
        }
    });

    println!("Stopped.");
    Ok(())
}
