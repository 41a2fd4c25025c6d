//! Render engine boundary
//!
//! The crawl core only talks to pages through [`RenderEngine`] and
//! [`RenderSession`]. A session is one tab-equivalent: it navigates, waits
//! for content to settle, and reports the final markup together with every
//! response body it saw on the way. [`HttpEngine`] is the built-in engine.

mod http;
mod resource;

pub use http::HttpEngine;
pub use resource::ResourceType;

use crate::RenderError;
use async_trait::async_trait;
use std::time::Duration;

/// Snapshot of one completed navigation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderedPage {
    /// URL that was requested
    pub url: String,

    /// Final markup after rendering
    pub html: String,

    /// Text bodies of responses captured during this navigation, the
    /// document response included
    pub response_bodies: Vec<String>,

    /// Absolute `href` targets of anchors in the rendered DOM
    pub anchor_hrefs: Vec<String>,

    /// `mailto:` hrefs found in the rendered DOM
    pub mailto_targets: Vec<String>,
}

/// Factory for render sessions
#[async_trait]
pub trait RenderEngine: Send + Sync {
    /// Opens a new session (one browser tab or equivalent)
    async fn new_session(&self) -> Result<Box<dyn RenderSession>, RenderError>;
}

/// A single render context, owned by exactly one worker
#[async_trait]
pub trait RenderSession: Send {
    /// Loads `url` and returns the rendered page
    ///
    /// All response bodies belonging to this navigation must be present in
    /// the returned page. Unreadable bodies are left out; only a failure of
    /// the navigation itself is an error.
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError>;

    /// Releases the underlying context
    async fn close(self: Box<Self>) -> Result<(), RenderError>;
}
