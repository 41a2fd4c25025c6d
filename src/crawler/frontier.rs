//! Crawl frontier: pending queue, visited set, and termination
//!
//! Every mutation happens under one mutex so that the budget check, the
//! visited insert and the dequeue are a single step. Idle workers park on a
//! [`Notify`] and are woken whenever the frontier changes: a URL is
//! enqueued, a page finishes, or the crawl is stopped.

use std::collections::{HashSet, VecDeque};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Mutex, MutexGuard, PoisonError};
use tokio::sync::Notify;

#[derive(Debug, Default)]
struct FrontierState {
    /// URLs waiting to be visited, FIFO
    pending: VecDeque<String>,

    /// Mirror of `pending` for O(1) duplicate checks
    queued: HashSet<String>,

    /// URLs that have been handed to a worker
    visited: HashSet<String>,

    /// Pages currently being processed
    in_flight: usize,
}

impl FrontierState {
    fn budget_reached(&self, budget: usize) -> bool {
        self.visited.len() >= budget
    }
}

/// Shared queue of URLs to visit plus the set of URLs already visited
///
/// Invariants:
/// - a URL is inserted into `visited` before a worker sees it
/// - a URL in `visited` is never queued again
/// - `visited` never holds more than `budget` entries
#[derive(Debug)]
pub struct Frontier {
    state: Mutex<FrontierState>,
    wake: Notify,
    budget: usize,
    stopped: AtomicBool,
}

/// A dequeued URL that is being processed
///
/// Dropping the lease marks the page as finished, which may let idle
/// workers observe that the crawl is drained. This also happens when the
/// owning worker panics.
#[derive(Debug)]
pub struct Lease<'a> {
    frontier: &'a Frontier,
    url: String,
}

impl Lease<'_> {
    /// The URL to process
    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Drop for Lease<'_> {
    fn drop(&mut self) {
        {
            let mut state = self.frontier.lock();
            state.in_flight = state.in_flight.saturating_sub(1);
        }
        self.frontier.wake.notify_waiters();
    }
}

impl Frontier {
    /// Creates a frontier holding only the seed URL
    pub fn new(seed: impl Into<String>, budget: usize) -> Self {
        let seed = seed.into();
        let mut state = FrontierState::default();
        state.queued.insert(seed.clone());
        state.pending.push_back(seed);

        Self {
            state: Mutex::new(state),
            wake: Notify::new(),
            budget,
            stopped: AtomicBool::new(false),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FrontierState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Removes the head of the queue if the budget allows another page
    ///
    /// The returned URL is already recorded as visited. Queue entries that
    /// were visited through [`Frontier::mark_visited`] in the meantime are
    /// discarded. Returns None when the queue is empty, the budget is
    /// exhausted, or the crawl was stopped.
    pub fn try_dequeue(&self) -> Option<Lease<'_>> {
        if self.is_stopped() {
            return None;
        }

        let mut state = self.lock();
        self.take_next(&mut state)
    }

    fn take_next(&self, state: &mut FrontierState) -> Option<Lease<'_>> {
        while !state.budget_reached(self.budget) {
            let url = state.pending.pop_front()?;
            state.queued.remove(&url);

            if state.visited.insert(url.clone()) {
                state.in_flight += 1;
                tracing::trace!("Dequeued {} ({} visited)", url, state.visited.len());
                return Some(Lease {
                    frontier: self,
                    url,
                });
            }
        }

        None
    }

    /// Waits for the next URL to process
    ///
    /// Returns None once the crawl is over: the budget is reached, the
    /// crawl was stopped, or the queue is empty while no page is in flight.
    /// An empty queue alone only parks the caller, since a page still being
    /// processed may enqueue more URLs.
    pub async fn next(&self) -> Option<Lease<'_>> {
        loop {
            let notified = self.wake.notified();
            tokio::pin!(notified);
            notified.as_mut().enable();

            {
                let mut state = self.lock();

                if self.is_stopped() || state.budget_reached(self.budget) {
                    drop(state);
                    self.wake.notify_waiters();
                    return None;
                }

                if let Some(lease) = self.take_next(&mut state) {
                    return Some(lease);
                }

                if state.in_flight == 0 {
                    drop(state);
                    self.wake.notify_waiters();
                    return None;
                }
            }

            notified.await;
        }
    }

    /// Atomically records `url` as visited
    ///
    /// Returns true if the caller may process the URL, false if it was
    /// already visited or the budget has no room left.
    pub fn mark_visited(&self, url: &str) -> bool {
        let mut state = self.lock();

        if state.visited.contains(url) || state.budget_reached(self.budget) {
            return false;
        }

        state.visited.insert(url.to_string())
    }

    /// Appends a discovered URL to the queue
    ///
    /// The URL is rejected if it is already visited or queued, or if the
    /// pages visited plus the pages queued already cover the budget.
    /// Returns true if the URL was queued.
    pub fn enqueue(&self, url: impl Into<String>) -> bool {
        if self.is_stopped() {
            return false;
        }

        let url = url.into();
        {
            let mut state = self.lock();

            if state.visited.contains(&url) || state.queued.contains(&url) {
                return false;
            }

            if state.visited.len() + state.pending.len() >= self.budget {
                tracing::trace!("Budget covered, not queueing {}", url);
                return false;
            }

            state.queued.insert(url.clone());
            state.pending.push_back(url);
        }

        self.wake.notify_waiters();
        true
    }

    /// Stops the crawl: no further URLs are handed out
    ///
    /// Pages already in flight finish normally.
    pub fn shutdown(&self) {
        self.stopped.store(true, Ordering::SeqCst);
        self.wake.notify_waiters();
    }

    /// Returns whether [`Frontier::shutdown`] was called
    pub fn is_stopped(&self) -> bool {
        self.stopped.load(Ordering::SeqCst)
    }

    /// Returns true when no more work can ever be handed out
    pub fn is_drained(&self) -> bool {
        let state = self.lock();
        self.is_stopped()
            || state.budget_reached(self.budget)
            || (state.pending.is_empty() && state.in_flight == 0)
    }

    /// Number of visited URLs
    pub fn visited_count(&self) -> usize {
        self.lock().visited.len()
    }

    /// Number of queued URLs
    pub fn pending_count(&self) -> usize {
        self.lock().pending.len()
    }

    /// Number of pages currently being processed
    pub fn in_flight(&self) -> usize {
        self.lock().in_flight
    }

    /// Returns whether `url` was visited
    pub fn is_visited(&self, url: &str) -> bool {
        self.lock().visited.contains(url)
    }

    /// Page budget of this crawl
    pub fn budget(&self) -> usize {
        self.budget
    }
}
