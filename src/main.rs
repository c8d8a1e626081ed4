//! Catalog Harvest main entry point
//!
//! This is the command-line interface for the catalog harvester.

use catalog_harvest::config::{load_config_with_hash, validate, Config};
use catalog_harvest::harvest::run_harvest;
use catalog_harvest::output::{load_statistics, print_statistics, print_summary};
use catalog_harvest::storage::SqliteStorage;
use clap::Parser;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Catalog Harvest: an incremental catalog scraper
///
/// Walks a range of catalog pages at a polite pace and reconciles the
/// scraped items into a SQLite store, writing only new or changed items.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version = "1.0.0")]
#[command(about = "An incremental catalog scraper", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// First page to harvest, overriding the config
    #[arg(long)]
    start_page: Option<u32>,

    /// Last page to harvest, overriding the config
    #[arg(long)]
    end_page: Option<u32>,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long, conflicts_with = "stats")]
    dry_run: bool,

    /// Show statistics from the item store and exit
    #[arg(long, conflicts_with = "dry_run")]
    stats: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (mut config, _config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.start_page.is_some() || cli.end_page.is_some() {
        if let Some(start) = cli.start_page {
            config.catalog.start_page = start;
        }
        if let Some(end) = cli.end_page {
            config.catalog.end_page = end;
        }
        validate(&config)?;
    }

    if cli.dry_run {
        handle_dry_run(&config);
    } else if cli.stats {
        handle_stats(&config)?;
    } else {
        handle_harvest(&config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("catalog_harvest=info,warn"),
            1 => EnvFilter::new("catalog_harvest=debug,info"),
            2 => EnvFilter::new("catalog_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: shows the plan without touching network or store
fn handle_dry_run(config: &Config) {
    println!("=== Catalog Harvest Dry Run ===\n");

    println!("Catalog:");
    println!(
        "  Pages: {}..={}",
        config.catalog.start_page, config.catalog.end_page
    );
    println!(
        "  Assumed page limit: {}",
        config.catalog.default_page_limit
    );
    println!(
        "  First URL: {}",
        config.catalog.page_url(config.catalog.start_page)
    );

    println!("\nRate Limit:");
    println!("  One request per {}ms", config.rate_limit.interval_ms);
    println!(
        "  Jitter: {}ms to {}ms after each permit",
        config.rate_limit.interval_ms, config.rate_limit.max_delay_ms
    );

    println!("\nStorage:");
    println!("  Database: {}", config.storage.database_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --stats mode: shows statistics from the store
fn handle_stats(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    println!("Database: {}\n", config.storage.database_path);

    let storage = SqliteStorage::new(Path::new(&config.storage.database_path))?;
    let stats = load_statistics(&storage)?;
    print_statistics(&stats);

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    // An unreachable store is the one fatal failure
    let mut storage = match SqliteStorage::new(Path::new(&config.storage.database_path)) {
        Ok(storage) => {
            tracing::info!("Connected to store at {}", config.storage.database_path);
            storage
        }
        Err(e) => {
            tracing::error!("Error connecting to store: {}", e);
            return Err(e.into());
        }
    };

    let summary = run_harvest(config, &mut storage).await?;
    print_summary(&summary);

    tracing::info!("Harvest completed");
    Ok(())
}
