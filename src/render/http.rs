//! HTTP render engine
//!
//! This engine handles page loading without a browser:
//! - Building one shared HTTP client with the configured user agent
//! - GET of the document under the navigation timeout, decoded with the
//!   charset the server declares
//! - Markup scanning for anchors, mailto links and script sources
//! - Concurrent capture of non-blocked sub-resource bodies
//!
//! JavaScript is not executed. Script bodies are still captured, so
//! addresses embedded in bundles and inline data are found.

use crate::config::RenderConfig;
use crate::extract::parse_markup;
use crate::render::{RenderEngine, RenderSession, RenderedPage, ResourceType};
use crate::RenderError;
use async_trait::async_trait;
use futures::future::join_all;
use reqwest::{redirect::Policy, Client};
use std::sync::Arc;
use std::time::Duration;

/// Settings shared by every session of one engine
#[derive(Debug)]
struct SessionSettings {
    blocked: Vec<ResourceType>,
    capture_scripts: bool,
    max_subresources: usize,
}

impl SessionSettings {
    fn allows(&self, resource: ResourceType) -> bool {
        !self.blocked.contains(&resource)
    }
}

/// Render engine backed by a plain HTTP client
#[derive(Debug, Clone)]
pub struct HttpEngine {
    client: Client,
    settings: Arc<SessionSettings>,
}

impl HttpEngine {
    /// Creates an engine with a freshly built HTTP client
    pub fn new(config: &RenderConfig) -> Result<Self, RenderError> {
        let client = build_http_client(config)
            .map_err(|e| RenderError::Session(format!("Failed to build HTTP client: {}", e)))?;
        Ok(Self::with_client(client, config))
    }

    /// Creates an engine around an existing client
    pub fn with_client(client: Client, config: &RenderConfig) -> Self {
        Self {
            client,
            settings: Arc::new(SessionSettings {
                blocked: ResourceType::parse_list(&config.blocked_resource_types),
                capture_scripts: config.capture_scripts,
                max_subresources: config.max_subresources,
            }),
        }
    }
}

#[async_trait]
impl RenderEngine for HttpEngine {
    async fn new_session(&self) -> Result<Box<dyn RenderSession>, RenderError> {
        Ok(Box::new(HttpSession {
            client: self.client.clone(),
            settings: Arc::clone(&self.settings),
            navigations: 0,
        }))
    }
}

/// One session of the HTTP engine
struct HttpSession {
    client: Client,
    settings: Arc<SessionSettings>,
    navigations: usize,
}

impl HttpSession {
    async fn load(&self, url: &str) -> Result<RenderedPage, RenderError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(RenderError::Navigation {
                url: url.to_string(),
                message: format!("HTTP {}", status.as_u16()),
            });
        }

        // Decoded with the Content-Type charset; invalid bytes are replaced
        let final_url = response.url().clone();
        let html = response
            .text()
            .await
            .map_err(|e| classify_transport_error(url, e))?;

        let markup = parse_markup(&html, &final_url);

        let mut response_bodies = vec![html.clone()];
        if self.settings.capture_scripts && self.settings.allows(ResourceType::Script) {
            let captures = markup
                .script_sources
                .iter()
                .take(self.settings.max_subresources)
                .map(|source| fetch_text(&self.client, source));

            for capture in join_all(captures).await {
                match capture {
                    Ok(body) => response_bodies.push(body),
                    Err(e) => tracing::debug!("Skipping captured response: {}", e),
                }
            }
        }

        Ok(RenderedPage {
            url: url.to_string(),
            html,
            response_bodies,
            anchor_hrefs: markup.anchor_hrefs,
            mailto_targets: markup.mailto_targets,
        })
    }
}

#[async_trait]
impl RenderSession for HttpSession {
    async fn navigate(&mut self, url: &str, timeout: Duration) -> Result<RenderedPage, RenderError> {
        self.navigations += 1;

        match tokio::time::timeout(timeout, self.load(url)).await {
            Ok(result) => result,
            Err(_) => Err(RenderError::Timeout {
                url: url.to_string(),
            }),
        }
    }

    async fn close(self: Box<Self>) -> Result<(), RenderError> {
        tracing::trace!("Closing HTTP session after {} navigations", self.navigations);
        Ok(())
    }
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The render configuration
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &RenderConfig) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetches one sub-resource body as text
///
/// Bodies are decoded like the document. Only a failed request, an error
/// status or a broken body stream make the capture unreadable.
async fn fetch_text(client: &Client, url: &str) -> Result<String, RenderError> {
    let read_error = |message: String| RenderError::ResponseRead {
        url: url.to_string(),
        message,
    };

    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| read_error(e.to_string()))?;

    if !response.status().is_success() {
        return Err(read_error(format!("HTTP {}", response.status().as_u16())));
    }

    response.text().await.map_err(|e| read_error(e.to_string()))
}

/// Maps a transport error on the document request to a navigation failure
fn classify_transport_error(url: &str, error: reqwest::Error) -> RenderError {
    if error.is_timeout() {
        RenderError::Timeout {
            url: url.to_string(),
        }
    } else if error.is_connect() {
        RenderError::Navigation {
            url: url.to_string(),
            message: "Connection refused".to_string(),
        }
    } else {
        RenderError::Navigation {
            url: url.to_string(),
            message: error.to_string(),
        }
    }
}
