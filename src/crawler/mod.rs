//! Crawl engine
//!
//! This module contains the core crawling logic, including:
//! - The frontier (pending queue, visited set, budget, termination)
//! - The shared email set
//! - The worker pool driving render sessions
//! - Overall crawl coordination

mod coordinator;
mod emails;
mod frontier;
mod pool;

pub use coordinator::{crawl, Coordinator};
pub use emails::EmailSet;
pub use frontier::{Frontier, Lease};
pub use pool::{close_sessions, PoolOutcome, WorkerPool, WorkerStats};
