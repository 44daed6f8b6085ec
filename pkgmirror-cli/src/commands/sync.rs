//! Sync command - bring the mirror and index up to date once.

use super::{describe_outcome, describe_stats};
use crate::error::CliError;
use crate::runner::{CliRunner, ConfigOverrides};

pub fn run(overrides: &ConfigOverrides) -> Result<(), CliError> {
    let runner = CliRunner::new(overrides)?;
    runner.log_startup("sync");

    let service = runner.create_service();
    let outcome = runner.runtime().block_on(service.initialize())?;

    println!("{}", describe_outcome(outcome));
    println!("{}", describe_stats(&service.get_stats()));
    Ok(())
}
