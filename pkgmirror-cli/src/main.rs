//! pkgmirror CLI - Command-line interface
//!
//! Mirrors a package-manifest repository and answers lookups, searches and
//! listings from the local index.

mod commands;
mod error;
mod runner;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::{QueryArgs, SearchArgs};
use runner::ConfigOverrides;

#[derive(Parser)]
#[command(name = "pkgmirror")]
#[command(version, about = "Mirror a package-manifest repository and search it locally", long_about = None)]
struct Cli {
    /// Config file (default: ~/.pkgmirror/config.ini)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Upstream repository URL
    #[arg(long, global = true)]
    repo_url: Option<String>,

    /// Local checkout directory
    #[arg(long, global = true)]
    local_path: Option<PathBuf>,

    /// Manifest directory inside the checkout
    #[arg(long, global = true)]
    manifest_path: Option<PathBuf>,

    /// Manifest format (winget)
    #[arg(long, global = true)]
    parser: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Clone or update the mirror and build the index
    Sync,

    /// Search packages by name or identifier
    Search {
        /// Search text (at least 2 characters)
        query: String,

        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page (default from config, capped)
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show one package by exact identifier
    Get {
        /// Package identifier, e.g. Mozilla.Firefox
        id: String,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// List indexed packages
    List {
        /// Page number, starting at 1
        #[arg(long, default_value = "1")]
        page: usize,

        /// Results per page (default from config, capped)
        #[arg(long)]
        limit: Option<usize>,

        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Show index size and last sync time
    Stats {
        /// Print JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Keep the index in sync on the configured interval until Ctrl-C
    Watch,
}

fn main() {
    let cli = Cli::parse();

    let overrides = ConfigOverrides {
        config: cli.config,
        repo_url: cli.repo_url,
        local_path: cli.local_path,
        manifest_path: cli.manifest_path,
        parser: cli.parser,
    };

    let result = match cli.command {
        Commands::Sync => commands::sync::run(&overrides),
        Commands::Search {
            query,
            page,
            limit,
            json,
        } => commands::query::search(
            &overrides,
            SearchArgs {
                query,
                page,
                limit,
                json,
            },
        ),
        Commands::Get { id, json } => commands::query::get(&overrides, &id, json),
        Commands::List { page, limit, json } => {
            commands::query::list(&overrides, QueryArgs { page, limit, json })
        }
        Commands::Stats { json } => commands::query::stats(&overrides, json),
        Commands::Watch => commands::watch::run(&overrides),
    };

    if let Err(e) = result {
        e.exit();
    }
}
