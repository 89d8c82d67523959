//! Linkwalk main entry point
//!
//! This is the command-line interface for the linkwalk crawler.

use anyhow::Context;
use clap::Parser;
use linkwalk::config::{load_config_with_hash, Config};
use linkwalk::crawler::crawl;
use linkwalk::output::print_report;
use linkwalk::url::parse_seed;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Linkwalk: a concurrent, deduplicating web crawler
///
/// Fetches the seed page, follows every anchor link it finds and fetches
/// each distinct URL exactly once. The crawl ends when no new links remain,
/// when the configured deadline passes, or on Ctrl-C.
#[derive(Parser, Debug)]
#[command(name = "linkwalk")]
#[command(version)]
#[command(about = "A concurrent, deduplicating web crawler", long_about = None)]
struct Cli {
    /// URL to start crawling from
    #[arg(long, value_name = "URL")]
    url: String,

    /// Path to an optional TOML configuration file
    #[arg(short, long, value_name = "FILE")]
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
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("failed to load configuration from {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::debug!("No configuration file given, using defaults");
            Config::default()
        }
    };

    let seed = parse_seed(&cli.url).context("invalid seed URL")?;

    let shutdown = CancellationToken::new();
    spawn_interrupt_handler(shutdown.clone());

    let report = crawl(&config, seed, shutdown)
        .await
        .context("crawl failed to start")?;

    tracing::info!(
        "Crawl finished ({}): {} URLs visited in {}ms",
        report.stop_reason,
        report.visited.len(),
        report.duration().num_milliseconds()
    );

    if !cli.quiet {
        print_report(&report);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("linkwalk=info,warn"),
            1 => EnvFilter::new("linkwalk=debug,info"),
            2 => EnvFilter::new("linkwalk=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr; stdout carries page output and the report.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Cancels `shutdown` on Ctrl-C
fn spawn_interrupt_handler(shutdown: CancellationToken) {
    tokio::spawn(async move {
        match tokio::signal::ctrl_c().await {
            Ok(()) => {
                tracing::warn!("Interrupt received, stopping crawl");
                shutdown.cancel();
            }
            Err(e) => tracing::error!("Failed to listen for interrupt: {}", e),
        }
    });
}
