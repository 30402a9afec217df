//! Mynavi-Scout main entry point
//!
//! Command-line interface for the Mynavi corp-search scraper.

use clap::Parser;
use mynavi_scout::config::{load_config, Config};
use mynavi_scout::output::save_companies;
use mynavi_scout::session::build_client;
use mynavi_scout::{ScrapeOutcome, Scraper, StopReason};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mynavi-Scout: scrape company listings from the Mynavi corp search
///
/// Submits a keyword search with the configured filters, pages through the
/// results while relaying the portal's anti-forgery tokens, and writes the
/// collected companies to a JSON file.
#[derive(Parser, Debug)]
#[command(name = "mynavi-scout")]
#[command(version = "0.1.0")]
#[command(about = "A corp-search scraper for the Mynavi job portal", long_about = None)]
struct Cli {
    /// Search keyword
    #[arg(value_name = "KEYWORD", default_value = "IT")]
    keyword: String,

    /// Number of companies to list in the console summary
    #[arg(value_name = "LIMIT", default_value_t = 5)]
    limit: usize,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    let config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)?
        }
        None => Config::default(),
    };

    tracing::info!(
        "Starting scrape (keyword: \"{}\", filters: {})",
        cli.keyword,
        config.filters.len()
    );

    let client = build_client(&config.http)?;
    let scraper = Scraper::new(client, config.clone(), cli.keyword.clone());

    let outcome = match scraper.run().await {
        Ok(outcome) => outcome,
        Err(e) => {
            // Fatal-to-startup: nothing was collected, end cleanly
            tracing::error!("Failed to acquire initial form parameters: {}", e);
            return Err(e.into());
        }
    };

    print_summary(&outcome, cli.limit);

    let path = save_companies(&config.output.results_dir, &cli.keyword, &outcome.companies)?;
    println!(
        "\nSaved {} companies to {}",
        outcome.companies.len(),
        path.display()
    );

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mynavi_scout=info,warn"),
            1 => EnvFilter::new("mynavi_scout=debug,info"),
            2 => EnvFilter::new("mynavi_scout=trace,debug"),
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

/// Prints the final run summary to the console
fn print_summary(outcome: &ScrapeOutcome, limit: usize) {
    println!("\n=== Scrape summary ===");
    println!(
        "Collected {} companies over {} page(s)",
        outcome.companies.len(),
        outcome.pages_fetched
    );
    if let Some(total) = outcome.total_reported {
        println!("Portal reported {} total results", total);
    }

    match &outcome.stop {
        StopReason::Completed | StopReason::NoMoreResults => {
            println!("Stopped: {}", outcome.stop)
        }
        reason => println!("Stopped early: {}", reason),
    }

    let shown = limit.min(outcome.companies.len());
    if shown > 0 {
        println!("\nTop {} companies:", shown);
        for (i, company) in outcome.companies.iter().take(shown).enumerate() {
            println!("{}. {} (ID: {})", i + 1, company.name, company.corp_id);
        }
    }
}
