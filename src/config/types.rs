use serde::Deserialize;
use std::time::Duration;

/// Main configuration structure for Mailsweep
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub crawler: CrawlerConfig,
    #[serde(default)]
    pub render: RenderConfig,
    #[serde(default)]
    pub server: ServerConfig,
}

/// Crawl engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CrawlerConfig {
    /// Maximum number of pages a crawl may visit
    #[serde(rename = "max-pages")]
    pub max_pages: usize,

    /// Number of concurrent workers, each holding one render session
    pub concurrency: usize,

    /// Upper bound on a single page navigation (milliseconds)
    #[serde(rename = "navigation-timeout-ms")]
    pub navigation_timeout_ms: u64,
}

impl CrawlerConfig {
    /// Navigation timeout as a duration
    pub fn navigation_timeout(&self) -> Duration {
        Duration::from_millis(self.navigation_timeout_ms)
    }
}

impl Default for CrawlerConfig {
    fn default() -> Self {
        Self {
            max_pages: 30,
            concurrency: 3,
            navigation_timeout_ms: 15_000,
        }
    }
}

/// Render engine configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// User agent sent with every request
    #[serde(rename = "user-agent")]
    pub user_agent: String,

    /// Sub-resource types aborted during navigation
    #[serde(rename = "blocked-resource-types")]
    pub blocked_resource_types: Vec<String>,

    /// Whether script responses are captured alongside the document
    #[serde(rename = "capture-scripts")]
    pub capture_scripts: bool,

    /// Cap on captured sub-responses per navigation
    #[serde(rename = "max-subresources")]
    pub max_subresources: usize,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            user_agent: format!(
                "mailsweep/{} (+https://github.com/mailsweep/mailsweep)",
                env!("CARGO_PKG_VERSION")
            ),
            blocked_resource_types: ["image", "font", "media", "stylesheet"]
                .iter()
                .map(|s| s.to_string())
                .collect(),
            capture_scripts: true,
            max_subresources: 32,
        }
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Socket address the server listens on
    #[serde(rename = "bind-address")]
    pub bind_address: String,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:3000".to_string(),
        }
    }
}
