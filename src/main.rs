//! Mailsweep main entry point
//!
//! This is the command-line interface for the Mailsweep email harvester.

use anyhow::Context;
use clap::{Parser, Subcommand};
use mailsweep::config::{load_config_with_hash, Config};
use mailsweep::crawler::Coordinator;
use mailsweep::output::{generate_markdown_summary, print_result, to_json};
use mailsweep::render::HttpEngine;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Mailsweep: harvest email addresses from a single web domain
///
/// Mailsweep crawls pages under a seed URL with a small pool of render
/// sessions and collects addresses from markup, captured responses and
/// mailto links.
#[derive(Parser, Debug)]
#[command(name = "mailsweep")]
#[command(version)]
#[command(about = "A single-domain email harvester", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(short, long, value_name = "CONFIG", global = true)]
    config: Option<PathBuf>,

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
    /// Crawl a domain and print the emails found
    Crawl {
        /// Domain or URL to start from (https:// is assumed)
        domain: String,

        /// Maximum number of pages to visit
        #[arg(long)]
        max_pages: Option<usize>,

        /// Number of concurrent render sessions
        #[arg(long)]
        concurrency: Option<usize>,

        /// Per-page navigation timeout in milliseconds
        #[arg(long)]
        timeout_ms: Option<u64>,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,

        /// Also write a markdown summary to this path
        #[arg(long, value_name = "PATH")]
        summary: Option<PathBuf>,
    },

    /// Serve the crawl over HTTP
    Serve {
        /// Address to listen on, overriding the config file
        #[arg(long)]
        bind: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    let config = load_configuration(cli.config.as_ref())?;

    match cli.command {
        Command::Crawl {
            domain,
            max_pages,
            concurrency,
            timeout_ms,
            json,
            summary,
        } => {
            let mut options = config.crawler.clone();
            if let Some(max_pages) = max_pages {
                options.max_pages = max_pages;
            }
            if let Some(concurrency) = concurrency {
                options.concurrency = concurrency;
            }
            if let Some(timeout_ms) = timeout_ms {
                options.navigation_timeout_ms = timeout_ms;
            }

            handle_crawl(&config, &domain, options, json, summary).await
        }
        Command::Serve { bind } => {
            let mut config = config;
            if let Some(bind) = bind {
                config.server.bind_address = bind;
            }
            mailsweep::server::serve(config)
                .await
                .context("Server failed")
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("mailsweep=info,warn"),
            1 => EnvFilter::new("mailsweep=debug,info"),
            2 => EnvFilter::new("mailsweep=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Loads the config file if one was given, defaults otherwise
fn load_configuration(path: Option<&PathBuf>) -> anyhow::Result<Config> {
    let Some(path) = path else {
        tracing::debug!("No configuration file given, using defaults");
        return Ok(Config::default());
    };

    tracing::info!("Loading configuration from: {}", path.display());
    let (config, hash) = load_config_with_hash(path)
        .with_context(|| format!("Failed to load configuration from {}", path.display()))?;
    tracing::info!("Configuration loaded successfully (hash: {})", hash);

    Ok(config)
}

/// Handles the crawl subcommand
async fn handle_crawl(
    config: &Config,
    domain: &str,
    options: mailsweep::config::CrawlerConfig,
    json: bool,
    summary: Option<PathBuf>,
) -> anyhow::Result<()> {
    let engine = HttpEngine::new(&config.render).context("Failed to start render engine")?;
    let coordinator = Coordinator::new(domain, options).context("Invalid crawl request")?;

    // Ctrl-C stops handing out pages; the partial result is still reported
    let frontier = coordinator.frontier();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupted, finishing pages in flight");
            frontier.shutdown();
        }
    });

    let result = coordinator.run(&engine).await.context("Crawl failed")?;

    if json {
        println!("{}", to_json(&result)?);
    } else {
        print_result(&result);
    }

    if let Some(path) = summary {
        generate_markdown_summary(&result, &path)
            .with_context(|| format!("Failed to write summary to {}", path.display()))?;
        tracing::info!("Summary written to {}", path.display());
    }

    Ok(())
}
