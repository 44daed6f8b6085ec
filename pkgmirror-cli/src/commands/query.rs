//! Read commands: search, get, list and stats.

use pkgmirror::index::MIN_QUERY_LEN;
use pkgmirror::package::SearchResult;

use super::{describe_record, describe_stats, start};
use crate::error::CliError;
use crate::runner::ConfigOverrides;

/// Paging and output options shared by search and list.
pub struct QueryArgs {
    pub page: usize,
    pub limit: Option<usize>,
    pub json: bool,
}

/// Arguments for the search command.
pub struct SearchArgs {
    pub query: String,
    pub page: usize,
    pub limit: Option<usize>,
    pub json: bool,
}

pub fn search(overrides: &ConfigOverrides, args: SearchArgs) -> Result<(), CliError> {
    let query = validate_query(&args.query)?;
    let (_runner, service) = start(overrides, "search")?;

    let result = service.search_packages(query, args.page, args.limit);
    print_page(&result, args.json)
}

pub fn get(overrides: &ConfigOverrides, id: &str, json: bool) -> Result<(), CliError> {
    let (_runner, service) = start(overrides, "get")?;

    let record = service
        .get_package(id)
        .ok_or_else(|| CliError::NotFound(id.to_string()))?;

    if json {
        println!("{}", serde_json::to_string_pretty(&record)?);
    } else {
        println!("{}", describe_record(&record));
    }
    Ok(())
}

pub fn list(overrides: &ConfigOverrides, args: QueryArgs) -> Result<(), CliError> {
    let (_runner, service) = start(overrides, "list")?;

    let result = service.list_packages(args.page, args.limit);
    print_page(&result, args.json)
}

pub fn stats(overrides: &ConfigOverrides, json: bool) -> Result<(), CliError> {
    let (_runner, service) = start(overrides, "stats")?;

    let stats = service.get_stats();
    if json {
        println!("{}", serde_json::to_string_pretty(&stats)?);
    } else {
        println!("{}", describe_stats(&stats));
    }
    Ok(())
}

/// Trim the query and reject it if it is too short to be useful.
fn validate_query(query: &str) -> Result<&str, CliError> {
    let trimmed = query.trim();
    if trimmed.chars().count() < MIN_QUERY_LEN {
        return Err(CliError::InvalidQuery(format!(
            "query must be at least {} characters",
            MIN_QUERY_LEN
        )));
    }
    Ok(trimmed)
}

fn print_page(result: &SearchResult, json: bool) -> Result<(), CliError> {
    if json {
        println!("{}", serde_json::to_string_pretty(result)?);
        return Ok(());
    }

    if result.packages.is_empty() {
        println!("No packages found ({} total)", result.total);
        return Ok(());
    }

    for record in &result.packages {
        println!("{}", record);
    }

    let pages = result.total.div_ceil(result.limit.max(1));
    println!();
    println!(
        "Page {} of {} ({} packages)",
        result.page, pages, result.total
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_query_trims() {
        assert_eq!(validate_query("  fox  ").unwrap(), "fox");
    }

    #[test]
    fn test_validate_query_rejects_short() {
        assert!(matches!(
            validate_query(" a "),
            Err(CliError::InvalidQuery(_))
        ));
        assert!(validate_query("").is_err());
        assert!(validate_query("ab").is_ok());
    }
}
