//! HTTP server exposing the crawl
//!
//! Routes:
//! - `GET /welcome` - liveness message
//! - `GET /extract-emails?domain=..&maxPages=..&concurrency=..` - run one crawl

mod routes;

pub use routes::{build_router, AppState, ExtractQuery};

use crate::config::Config;
use crate::render::HttpEngine;
use crate::SweepError;
use std::sync::Arc;

/// Binds the configured address and serves until the process is stopped
pub async fn serve(config: Config) -> Result<(), SweepError> {
    let engine = HttpEngine::new(&config.render)?;
    let bind_address = config.server.bind_address.clone();

    let state = AppState {
        defaults: config.crawler,
        engine: Arc::new(engine),
    };
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Mailsweep listening on {}", bind_address);

    axum::serve(listener, app)
        .await
        .map_err(|e| SweepError::Server(e.to_string()))
}
