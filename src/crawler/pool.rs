//! Worker pool: N workers, one render session each, one shared frontier
//!
//! Each worker loops on the frontier until it reports the crawl is over.
//! Per-page failures are logged and swallowed; they never end a worker.
//! When every worker has exited, the sessions are handed back to the
//! caller for teardown.

use crate::crawler::{EmailSet, Frontier};
use crate::extract::{extract_emails, extract_links, extract_mailto_targets};
use crate::render::{RenderEngine, RenderSession, RenderedPage};
use crate::RenderError;
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;

/// Per-worker counters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WorkerStats {
    /// Pages rendered successfully
    pub pages_rendered: usize,

    /// Pages whose navigation failed or timed out
    pub pages_failed: usize,

    /// Links this worker added to the frontier
    pub links_queued: usize,
}

impl WorkerStats {
    fn absorb(&mut self, other: WorkerStats) {
        self.pages_rendered += other.pages_rendered;
        self.pages_failed += other.pages_failed;
        self.links_queued += other.links_queued;
    }
}

/// What a finished pool run hands back
pub struct PoolOutcome {
    /// Sessions of every worker that exited normally, still open
    pub sessions: Vec<Box<dyn RenderSession>>,

    /// Totals across workers
    pub stats: WorkerStats,

    /// Workers that ended abnormally (panicked)
    pub workers_lost: usize,
}

/// Fixed-size pool of crawl workers
#[derive(Debug, Clone)]
pub struct WorkerPool {
    concurrency: usize,
    navigation_timeout: Duration,
    origin_prefix: Arc<str>,
}

impl WorkerPool {
    /// Creates a pool
    ///
    /// # Arguments
    ///
    /// * `concurrency` - Number of workers (and sessions)
    /// * `navigation_timeout` - Bound on each page navigation
    /// * `origin_prefix` - Links must start with this to be followed
    pub fn new(concurrency: usize, navigation_timeout: Duration, origin_prefix: &str) -> Self {
        Self {
            concurrency: concurrency.max(1),
            navigation_timeout,
            origin_prefix: Arc::from(origin_prefix),
        }
    }

    /// Opens one session per worker
    ///
    /// If any session fails to open, the ones already open are closed
    /// before the error is returned.
    pub async fn open_sessions(
        &self,
        engine: &dyn RenderEngine,
    ) -> Result<Vec<Box<dyn RenderSession>>, RenderError> {
        let mut sessions = Vec::with_capacity(self.concurrency);

        for worker_id in 0..self.concurrency {
            match engine.new_session().await {
                Ok(session) => sessions.push(session),
                Err(e) => {
                    tracing::warn!("Failed to open session for worker {}: {}", worker_id, e);
                    close_sessions(sessions).await;
                    return Err(e);
                }
            }
        }

        Ok(sessions)
    }

    /// Runs one worker per session until the frontier is drained
    ///
    /// Blocks until every worker has exited. Sessions of workers that exit
    /// normally are returned open; the caller closes them.
    pub async fn run_to_completion(
        &self,
        sessions: Vec<Box<dyn RenderSession>>,
        frontier: Arc<Frontier>,
        emails: Arc<EmailSet>,
    ) -> PoolOutcome {
        let mut workers = JoinSet::new();

        for (worker_id, session) in sessions.into_iter().enumerate() {
            let worker = Worker {
                id: worker_id,
                frontier: Arc::clone(&frontier),
                emails: Arc::clone(&emails),
                navigation_timeout: self.navigation_timeout,
                origin_prefix: Arc::clone(&self.origin_prefix),
            };
            workers.spawn(worker.run(session));
        }

        let mut outcome = PoolOutcome {
            sessions: Vec::with_capacity(self.concurrency),
            stats: WorkerStats::default(),
            workers_lost: 0,
        };

        while let Some(joined) = workers.join_next().await {
            match joined {
                Ok((session, stats)) => {
                    outcome.stats.absorb(stats);
                    outcome.sessions.push(session);
                }
                Err(e) => {
                    tracing::error!("Worker task ended abnormally: {}", e);
                    outcome.workers_lost += 1;
                }
            }
        }

        outcome
    }
}

/// Closes every session, logging failures
pub async fn close_sessions(sessions: Vec<Box<dyn RenderSession>>) {
    for session in sessions {
        if let Err(e) = session.close().await {
            tracing::warn!("Failed to close render session: {}", e);
        }
    }
}

/// State owned by one worker task
struct Worker {
    id: usize,
    frontier: Arc<Frontier>,
    emails: Arc<EmailSet>,
    navigation_timeout: Duration,
    origin_prefix: Arc<str>,
}

impl Worker {
    async fn run(
        self,
        mut session: Box<dyn RenderSession>,
    ) -> (Box<dyn RenderSession>, WorkerStats) {
        let mut stats = WorkerStats::default();
        tracing::debug!("Worker {} started", self.id);

        while let Some(lease) = self.frontier.next().await {
            let url = lease.url().to_string();

            match self.navigate(session.as_mut(), &url).await {
                Ok(page) => {
                    stats.pages_rendered += 1;
                    stats.links_queued += self.harvest(&page);
                }
                Err(e) => {
                    stats.pages_failed += 1;
                    tracing::debug!("Worker {}: no content from {}: {}", self.id, url, e);
                }
            }

            drop(lease);

            let visited = self.frontier.visited_count();
            if visited % 10 == 0 {
                tracing::info!(
                    "Progress: {} pages visited, {} queued, {} emails",
                    visited,
                    self.frontier.pending_count(),
                    self.emails.len()
                );
            }
        }

        tracing::debug!(
            "Worker {} finished: {} rendered, {} failed",
            self.id,
            stats.pages_rendered,
            stats.pages_failed
        );
        (session, stats)
    }

    /// Navigates under the timeout, even if the engine ignores it
    async fn navigate(
        &self,
        session: &mut dyn RenderSession,
        url: &str,
    ) -> Result<RenderedPage, RenderError> {
        match tokio::time::timeout(
            self.navigation_timeout,
            session.navigate(url, self.navigation_timeout),
        )
        .await
        {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    /// Merges a page's emails and queues its same-origin links
    ///
    /// Returns the number of links queued.
    fn harvest(&self, page: &RenderedPage) -> usize {
        let mut found: HashSet<String> = extract_emails(&page.html);
        for body in &page.response_bodies {
            found.extend(extract_emails(body));
        }
        found.extend(extract_mailto_targets(&page.mailto_targets));

        let new_emails = self.emails.merge(found);

        let queued = extract_links(page, &self.origin_prefix)
            .into_iter()
            .filter(|link| self.frontier.enqueue(link.as_str()))
            .count();

        tracing::debug!(
            "Worker {}: {} -> {} new emails, {} links queued",
            self.id,
            page.url,
            new_emails,
            queued
        );

        queued
    }
}
