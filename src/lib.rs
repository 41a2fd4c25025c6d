//! Mailsweep: a single-domain email harvester
//!
//! This crate crawls one web domain from a seed URL with a bounded pool of
//! render sessions, and collects email addresses found in rendered markup,
//! captured network responses and `mailto:` links.

pub mod config;
pub mod crawler;
pub mod extract;
pub mod output;
pub mod render;
pub mod server;
pub mod url;

use thiserror::Error;

/// Main error type for Mailsweep operations
#[derive(Debug, Error)]
pub enum SweepError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("URL error: {0}")]
    Url(#[from] UrlError),

    #[error("Render engine error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Server error: {0}")]
    Server(String),
}

/// Configuration-specific errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Invalid URL in config: {0}")]
    InvalidUrl(String),
}

/// URL-specific errors
#[derive(Debug, Error)]
pub enum UrlError {
    #[error("Domain is required")]
    Empty,

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),
}

/// Errors raised at the render engine boundary
///
/// `Timeout` and `Navigation` are per-URL navigation failures, `ResponseRead`
/// is a per-body failure. The worker pool recovers from all of them locally.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Navigation timeout for {url}")]
    Timeout { url: String },

    #[error("Navigation failed for {url}: {message}")]
    Navigation { url: String, message: String },

    #[error("Could not read response body from {url}: {message}")]
    ResponseRead { url: String, message: String },

    #[error("Render session error: {0}")]
    Session(String),
}

impl RenderError {
    /// Returns true for errors that cost a whole page visit
    pub fn is_navigation_failure(&self) -> bool {
        matches!(self, Self::Timeout { .. } | Self::Navigation { .. })
    }
}

/// Result type alias for Mailsweep operations
pub type Result<T> = std::result::Result<T, SweepError>;

/// Result type alias for configuration operations
pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Result type alias for URL operations
pub type UrlResult<T> = std::result::Result<T, UrlError>;

// Re-export commonly used types
pub use config::Config;
pub use crawler::{crawl, Coordinator, Frontier};
pub use output::CrawlResult;
pub use render::{HttpEngine, RenderEngine, RenderSession, RenderedPage};
pub use url::{is_same_origin, normalize_seed};
