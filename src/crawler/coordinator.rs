//! Crawler coordinator - orchestration of one crawl
//!
//! This module wires a seed into a fresh frontier and email set, runs the
//! worker pool to completion, tears down every session, and assembles the
//! result. No crawl state outlives a [`Coordinator`].

use crate::config::validation::validate_crawler_config;
use crate::config::CrawlerConfig;
use crate::crawler::pool::{close_sessions, WorkerPool};
use crate::crawler::{EmailSet, Frontier};
use crate::output::{CrawlResult, Performance};
use crate::render::RenderEngine;
use crate::url::normalize_seed;
use crate::SweepError;
use std::sync::Arc;
use std::time::Instant;

/// One crawl, from seed to result
pub struct Coordinator {
    seed: String,
    options: CrawlerConfig,
    frontier: Arc<Frontier>,
    emails: Arc<EmailSet>,
}

impl Coordinator {
    /// Creates a coordinator for one crawl
    ///
    /// # Arguments
    ///
    /// * `seed_input` - Domain or URL; `https://` is prefixed when no scheme is given
    /// * `options` - Budget, concurrency and navigation timeout
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Ready to run
    /// * `Err(SweepError)` - Empty or unparseable seed, or invalid options
    pub fn new(seed_input: &str, options: CrawlerConfig) -> Result<Self, SweepError> {
        let seed = normalize_seed(seed_input)?;
        validate_crawler_config(&options)?;

        let frontier = Arc::new(Frontier::new(seed.clone(), options.max_pages));

        Ok(Self {
            seed,
            options,
            frontier,
            emails: Arc::new(EmailSet::new()),
        })
    }

    /// The normalized seed URL
    pub fn seed(&self) -> &str {
        &self.seed
    }

    /// Handle to the frontier, for stopping the crawl from outside
    pub fn frontier(&self) -> Arc<Frontier> {
        Arc::clone(&self.frontier)
    }

    /// Runs the crawl to completion
    ///
    /// Per-page failures never surface here. The only error is failing to
    /// open the render sessions, in which case nothing was crawled.
    pub async fn run(self, engine: &dyn RenderEngine) -> Result<CrawlResult, SweepError> {
        let start_time = Instant::now();
        tracing::info!(
            "Starting crawl of {} (max {} pages, {} workers)",
            self.seed,
            self.options.max_pages,
            self.options.concurrency
        );

        let pool = WorkerPool::new(
            self.options.concurrency,
            self.options.navigation_timeout(),
            &self.seed,
        );

        let sessions = pool.open_sessions(engine).await?;
        let outcome = pool
            .run_to_completion(sessions, Arc::clone(&self.frontier), Arc::clone(&self.emails))
            .await;

        close_sessions(outcome.sessions).await;

        if outcome.workers_lost > 0 {
            tracing::warn!("{} workers ended abnormally", outcome.workers_lost);
        }

        let result = CrawlResult::new(
            self.seed,
            self.frontier.visited_count(),
            outcome.stats.pages_failed,
            self.emails.snapshot(),
            Performance {
                concurrency: self.options.concurrency,
                max_pages: self.options.max_pages,
            },
        );

        tracing::info!(
            "Crawl completed: {} pages, {} emails in {:?}",
            result.pages_crawled,
            result.total_emails,
            start_time.elapsed()
        );

        Ok(result)
    }
}

/// Crawls one domain and returns the collected emails
///
/// # Example
///
/// ```no_run
/// use mailsweep::config::{CrawlerConfig, RenderConfig};
/// use mailsweep::crawler::crawl;
/// use mailsweep::render::HttpEngine;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let engine = HttpEngine::new(&RenderConfig::default())?;
/// let result = crawl(&engine, "example.com", CrawlerConfig::default()).await?;
/// println!("{} emails on {} pages", result.total_emails, result.pages_crawled);
/// # Ok(())
/// # }
/// ```
pub async fn crawl(
    engine: &dyn RenderEngine,
    seed_input: &str,
    options: CrawlerConfig,
) -> Result<CrawlResult, SweepError> {
    Coordinator::new(seed_input, options)?.run(engine).await
}
