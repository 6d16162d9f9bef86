//! Apizoo-Harvest main entry point
//!
//! This is the command-line interface for scraping API documentation pages
//! and publishing the results to the catalog repository.

use apizoo_harvest::config::{load_config_with_hash, Config};
use apizoo_harvest::publish::GitHubPublisher;
use apizoo_harvest::reconcile::{to_json, EntryOverride, FinalResults};
use apizoo_harvest::service::{ConvertRequest, ErrorPayload, Harvester, RaisePrRequest};
use apizoo_harvest::HarvestError;
use clap::{Parser, Subcommand};
use indexmap::IndexMap;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Environment variable holding the hosting API credential
const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Apizoo-Harvest: API documentation scraper and catalog submitter
///
/// Scrapes API documentation pages into structured records and publishes
/// the successful ones as a submission to the shared API catalog.
#[derive(Parser, Debug)]
#[command(name = "apizoo-harvest")]
#[command(version = "1.0.0")]
#[command(about = "API documentation scraper and catalog submitter", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose", global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Scrape documentation URLs and print the reconciled results as JSON
    Convert {
        /// Catalog user name attached to every record
        #[arg(long)]
        user_name: String,

        /// JSON file mapping URLs to per-entry overrides
        #[arg(long, value_name = "FILE")]
        overrides: Option<PathBuf>,

        /// Write the results here instead of stdout
        #[arg(short, long, value_name = "FILE")]
        output: Option<PathBuf>,

        /// Documentation page URLs, in output order
        #[arg(value_name = "URL")]
        urls: Vec<String>,
    },

    /// Publish the successful records of a saved convert result
    Publish {
        /// Catalog user name the submission is filed under
        #[arg(long)]
        user_name: String,

        /// JSON file produced by `convert`
        #[arg(long, value_name = "FILE")]
        results: PathBuf,
    },

    /// Validate the configuration and show what would be used
    Check,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    let result = match cli.command {
        Command::Convert {
            user_name,
            overrides,
            output,
            urls,
        } => handle_convert(&config, user_name, overrides, output, urls).await,
        Command::Publish { user_name, results } => {
            handle_publish(&config, user_name, results).await
        }
        Command::Check => {
            handle_check(&config);
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!("{}", e);
        eprintln!("{}", serde_json::to_string(&ErrorPayload::from(e))?);
    }

    result.map_err(Into::into)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("apizoo_harvest=info,warn"),
            1 => EnvFilter::new("apizoo_harvest=debug,info"),
            2 => EnvFilter::new("apizoo_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr so stdout stays clean JSON
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles `convert`: scrape, reconcile, and emit the result mapping
async fn handle_convert(
    config: &Config,
    user_name: String,
    overrides: Option<PathBuf>,
    output: Option<PathBuf>,
    urls: Vec<String>,
) -> Result<(), HarvestError> {
    let overrides: IndexMap<String, EntryOverride> = match overrides {
        Some(path) => serde_json::from_str(&std::fs::read_to_string(path)?)?,
        None => IndexMap::new(),
    };

    let harvester = Harvester::from_config(config)?;
    let results = harvester
        .convert(ConvertRequest {
            api_urls: urls,
            user_name,
            overrides,
        })
        .await?;

    tracing::info!(
        "Converted {} URLs: {} succeeded, {} failed",
        results.len(),
        results.success_count(),
        results.failure_count()
    );

    let json = to_json(&results)?;
    match output {
        Some(path) => {
            std::fs::write(&path, format!("{}\n", json))?;
            tracing::info!("Results written to: {}", path.display());
        }
        None => println!("{}", json),
    }

    Ok(())
}

/// Handles `publish`: fork, branch, commit, and print the compare URL
async fn handle_publish(
    config: &Config,
    user_name: String,
    results: PathBuf,
) -> Result<(), HarvestError> {
    let api_urls: FinalResults = serde_json::from_str(&std::fs::read_to_string(&results)?)?;
    let token = std::env::var(TOKEN_ENV).ok();

    let harvester = Harvester::from_config(config)?;
    let publisher = GitHubPublisher::from_config(config)?;

    let published = harvester
        .raise_pr(
            RaisePrRequest {
                user_name,
                api_urls,
            },
            token.as_deref(),
            &publisher,
        )
        .await?;

    println!("{}", serde_json::to_string_pretty(&published)?);
    Ok(())
}

/// Handles `check`: prints the validated configuration
fn handle_check(config: &Config) {
    println!("=== Apizoo-Harvest Configuration ===\n");

    println!("Scraper:");
    println!("  Request timeout: {}s", config.scraper.request_timeout_secs);
    println!("  Connect timeout: {}s", config.scraper.connect_timeout_secs);
    println!(
        "  Max concurrent fetches: {}",
        config.scraper.max_concurrent_fetches
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nCatalog:");
    println!("  Repository: {}", config.catalog.repository);
    println!("  Base branch: {}", config.catalog.base_branch);
    println!("  Data dir: {}", config.catalog.data_dir);
    println!("  API URL: {}", config.catalog.api_url);
    println!("  Web URL: {}", config.catalog.web_url);

    println!("\n✓ Configuration is valid");
}
