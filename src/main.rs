//! Quote-Harvest main entry point
//!
//! This is the command-line interface for the Quote-Harvest collector.

use clap::Parser;
use quote_harvest::config::{load_config_with_hash, validate, Config};
use quote_harvest::crawler::harvest_to_csv;
use quote_harvest::output::{print_statistics, read_records, HarvestStatistics};
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Quote-Harvest: a paginating quote collector
///
/// Quote-Harvest walks a quote-listing site page by page, extracts each
/// quote's text, author and tags, and writes them all to a CSV file.
#[derive(Parser, Debug)]
#[command(name = "quote-harvest")]
#[command(version)]
#[command(about = "A paginating quote collector", long_about = None)]
struct Cli {
    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Output CSV path (overrides the config file)
    #[arg(short, long, value_name = "PATH")]
    output: Option<PathBuf>,

    /// First page to fetch (overrides the config file)
    #[arg(long, value_name = "URL")]
    start_url: Option<String>,

    /// Stop after this many pages (overrides the config file)
    #[arg(long, value_name = "N")]
    max_pages: Option<usize>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching
    #[arg(long, conflicts_with = "summary_only")]
    dry_run: bool,

    /// Print statistics for an existing CSV and exit
    #[arg(long, value_name = "CSV", conflicts_with = "dry_run")]
    summary_only: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    if let Some(csv_path) = &cli.summary_only {
        return handle_summary(csv_path);
    }

    let config = match resolve_config(&cli) {
        Ok(config) => config,
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e);
        }
    };

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    handle_harvest(config, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("quote_harvest=info,warn"),
            1 => EnvFilter::new("quote_harvest=debug,info"),
            2 => EnvFilter::new("quote_harvest=trace,debug"),
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

/// Loads the config file (if any) and applies command-line overrides
fn resolve_config(cli: &Cli) -> Result<Config, Box<dyn std::error::Error>> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => Config::default(),
    };

    if let Some(output) = &cli.output {
        config.output.csv_path = output.display().to_string();
    }
    if let Some(start_url) = &cli.start_url {
        config.scraper.start_url = start_url.clone();
    }
    if let Some(max_pages) = cli.max_pages {
        config.scraper.max_pages = Some(max_pages);
    }

    // Overrides bypass the file validation, so check again
    validate(&config)?;
    Ok(config)
}

/// Handles the --dry-run mode: shows the effective configuration
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Harvest Dry Run ===\n");

    println!("Scraper:");
    println!("  Start URL: {}", config.scraper.start_url);
    println!(
        "  Request timeout: {}s",
        config.scraper.request_timeout_secs
    );
    println!("  Page delay: {}ms", config.scraper.page_delay_ms);
    match config.scraper.max_pages {
        Some(max) => println!("  Max pages: {}", max),
        None => println!("  Max pages: unlimited"),
    }

    println!("\nUser Agent: {}", config.user_agent.header_value());

    println!("\nSelectors:");
    println!("  Quote: {}", config.selectors.quote);
    println!("  Text: {}", config.selectors.text);
    println!("  Author: {}", config.selectors.author);
    println!("  Tag: {}", config.selectors.tag);
    println!("  Next: {}", config.selectors.next);

    println!("\nOutput: {}", config.output.csv_path);

    println!("\n✓ Configuration is valid");
}

/// Handles the --summary-only mode: statistics for an existing CSV
fn handle_summary(csv_path: &Path) -> Result<(), Box<dyn std::error::Error>> {
    let records = read_records(csv_path)?;
    tracing::info!("Read {} quotes from {}", records.len(), csv_path.display());
    print_statistics(&HarvestStatistics::from_records(&records));
    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config, quiet: bool) -> Result<(), Box<dyn std::error::Error>> {
    let output_path = PathBuf::from(&config.output.csv_path);

    match harvest_to_csv(config, &output_path).await {
        Ok(harvest) => {
            tracing::info!("Harvest completed successfully");
            if !quiet {
                print_statistics(&HarvestStatistics::from_harvest(&harvest));
            }
            Ok(())
        }
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            Err(e.into())
        }
    }
}
