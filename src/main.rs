//! Quote-Sieve main entry point
//!
//! This is the command-line interface for the Quote-Sieve quote harvester.

use anyhow::Context;
use clap::Parser;
use quote_sieve::config::{validate, Config};
use quote_sieve::crawler::run_crawl;
use quote_sieve::output::print_statistics;
use tracing_subscriber::EnvFilter;

/// Quote-Sieve: a small, polite quote harvester
///
/// Quote-Sieve fetches a fixed run of quote listing pages on a pool of worker
/// threads, drops quotes it has already seen, and saves the rest to a CSV
/// file.
#[derive(Parser, Debug)]
#[command(name = "quote-sieve")]
#[command(version)]
#[command(about = "A small, polite quote harvester", long_about = None)]
struct Cli {
    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show what would be crawled without fetching anything
    #[arg(long)]
    dry_run: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = Config::default();
    validate(&config).context("built-in configuration is invalid")?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    let output = config.output.path.clone();
    let summary = run_crawl(config)
        .with_context(|| format!("crawl writing to {} failed", output.display()))?;

    println!("Crawl complete! Data saved to {}", output.display());
    if !cli.quiet {
        println!();
        print_statistics(&summary);
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
///
/// `RUST_LOG` wins over the flags when it is set, except under `--quiet`.
/// Worker threads are named, so every line carries the worker that wrote it.
fn setup_logging(verbose: u8, quiet: bool) {
    let directives = log_directives(verbose, quiet);
    let filter = if quiet {
        EnvFilter::new(directives)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(directives))
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_names(true)
        .with_file(false)
        .init();
}

/// Filter directives for the verbosity flags
///
/// Page-level outcomes are logged at info, per-quote dedup decisions at trace.
fn log_directives(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "quote_sieve=info,warn",
        1 => "quote_sieve=debug,info",
        2 => "quote_sieve=trace,debug",
        _ => "trace",
    }
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Quote-Sieve Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Pages: {}", config.crawler.page_count);
    println!("  Workers: {}", config.crawler.worker_count);
    println!("  Fetch timeout: {:?}", config.crawler.fetch_timeout);
    println!("  Pacing delay: {:?}", config.crawler.pacing_delay);

    println!("\nSource:");
    println!("  URL template: {}", config.source.url_template);
    println!("  User agent: {}", config.source.user_agent);

    println!("\nOutput:");
    println!("  File: {}", config.output.path.display());
    println!("  Columns: {}", config.output.header.join(", "));

    let urls = config.page_urls();
    println!("\nPages ({}):", urls.len());
    for url in &urls {
        println!("  - {}", url);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would crawl {} pages with {} workers", urls.len(), config.crawler.worker_count);
}
