//! Catalog-Harvest main entry point
//!
//! This is the command-line interface for the Catalog-Harvest product
//! catalog extractor.

use anyhow::{bail, Context};
use catalog_harvest::config::{load_config_with_hash, resolve_targets, validate, Config};
use catalog_harvest::crawler::{run_targets, ChromiumRenderer};
use catalog_harvest::output::{print_report, CsvSink};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

/// Catalog-Harvest: a product catalog extractor
///
/// Catalog-Harvest fetches category pages, expands "load more" pages in a
/// headless browser, and writes every listed product to one CSV file per
/// category.
#[derive(Parser, Debug)]
#[command(name = "catalog-harvest")]
#[command(version)]
#[command(about = "A product catalog extractor", long_about = None)]
struct Cli {
    /// Path to TOML configuration file (built-in targets when omitted)
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be harvested without fetching anything
    #[arg(long)]
    dry_run: bool,

    /// Directory CSV files are written to (overrides [output] directory)
    #[arg(long, value_name = "DIR")]
    output_dir: Option<PathBuf>,

    /// Keep going after a target fails and report every outcome
    #[arg(long)]
    keep_going: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = load_config_with_hash(path)
                .with_context(|| format!("Failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        None => {
            tracing::info!("No configuration file given, using built-in targets");
            Config::default()
        }
    };

    if let Some(dir) = &cli.output_dir {
        config.output.directory = dir.display().to_string();
    }
    if cli.keep_going {
        config.crawler.isolate_failures = true;
    }
    validate(&config).context("Invalid configuration")?;

    if cli.dry_run {
        handle_dry_run(&config)?;
        return Ok(());
    }

    handle_harvest(config).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
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

/// Handles the --dry-run mode: validates config and shows what would be harvested
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    let targets = resolve_targets(config)?;

    println!("=== Catalog-Harvest Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Consent timeout: {}ms", config.crawler.consent_timeout_ms);
    println!("  Load-more timeout: {}ms", config.crawler.load_more_timeout_ms);
    println!("  Max load-more clicks: {}", config.crawler.max_load_more_clicks);
    println!("  Request timeout: {}s", config.crawler.request_timeout_secs);
    println!("  Isolate failures: {}", config.crawler.isolate_failures);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    if let Some(contact) = &config.user_agent.contact_url {
        println!("  Contact URL: {}", contact);
    }

    println!("\nBrowser:");
    println!(
        "  Executable: {}",
        config.browser.executable.as_deref().unwrap_or("(auto-detect)")
    );
    println!("  Headless: {}", config.browser.headless);

    println!("\nOutput:");
    println!("  Directory: {}", config.output.directory);

    println!("\nTargets ({}):", targets.len());
    for target in &targets {
        println!("  - {} <- {}", target.destination, target.url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would harvest {} category pages", targets.len());

    Ok(())
}

/// Handles the main harvest operation
async fn handle_harvest(config: Config) -> anyhow::Result<()> {
    tracing::info!(
        "Harvesting {} targets into {}",
        config.targets.len(),
        config.output.directory
    );

    let renderer = Arc::new(ChromiumRenderer::new(
        config.browser.clone(),
        Duration::from_secs(config.crawler.request_timeout_secs),
    ));
    let sink = Box::new(CsvSink::new(&config.output.directory));

    let report = match run_targets(config, renderer, sink).await {
        Ok(report) => report,
        Err(e) => {
            tracing::error!("Harvest failed: {}", e);
            return Err(e.into());
        }
    };

    print_report(&report);

    if !report.is_success() {
        bail!("{} of {} targets failed", report.failed_count(), report.outcomes.len());
    }

    tracing::info!("Harvest completed successfully");
    Ok(())
}
