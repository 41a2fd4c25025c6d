use crate::config::CrawlerConfig;
use crate::crawler::crawl;
use crate::output::CrawlResult;
use crate::render::RenderEngine;
use crate::{SweepError, UrlError};
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::json;
use std::sync::Arc;

/// Shared state of the server
#[derive(Clone)]
pub struct AppState {
    /// Crawl settings used when a request does not override them
    pub defaults: CrawlerConfig,

    /// Engine every crawl opens its sessions from
    pub engine: Arc<dyn RenderEngine>,
}

/// Query parameters of `/extract-emails`
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExtractQuery {
    pub domain: Option<String>,
    pub max_pages: Option<usize>,
    pub concurrency: Option<usize>,
}

/// Builds the application router
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/welcome", get(welcome))
        .route("/extract-emails", get(extract_emails))
        .with_state(state)
}

async fn welcome() -> Json<serde_json::Value> {
    Json(json!({
        "message": "Welcome to the app",
        "status": "running"
    }))
}

async fn extract_emails(
    State(state): State<AppState>,
    Query(query): Query<ExtractQuery>,
) -> Result<Json<CrawlResult>, ApiError> {
    let domain = query
        .domain
        .as_deref()
        .map(str::trim)
        .filter(|d| !d.is_empty())
        .ok_or_else(|| ApiError::bad_request("Domain is required"))?;

    let mut options = state.defaults.clone();
    if let Some(max_pages) = query.max_pages {
        options.max_pages = max_pages;
    }
    if let Some(concurrency) = query.concurrency {
        options.concurrency = concurrency;
    }

    let result = crawl(state.engine.as_ref(), domain, options).await?;
    Ok(Json(result))
}

/// Error body returned to HTTP callers
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }
}

impl From<SweepError> for ApiError {
    fn from(error: SweepError) -> Self {
        let status = match &error {
            SweepError::Url(UrlError::Empty) => {
                return Self::bad_request("Domain is required");
            }
            SweepError::Url(_) | SweepError::Config(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        };

        if status.is_server_error() {
            tracing::error!("Crawl request failed: {}", error);
        }

        Self {
            status,
            message: error.to_string(),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
