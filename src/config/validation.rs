use crate::config::types::{Config, CrawlerConfig, RenderConfig, ServerConfig};
use crate::render::ResourceType;
use crate::ConfigError;
use std::net::SocketAddr;

/// Upper bound on workers; each one holds a render session open
const MAX_CONCURRENCY: usize = 64;

/// Validates the entire configuration
pub fn validate(config: &Config) -> Result<(), ConfigError> {
    validate_crawler_config(&config.crawler)?;
    validate_render_config(&config.render)?;
    validate_server_config(&config.server)?;
    Ok(())
}

/// Validates crawler configuration
pub(crate) fn validate_crawler_config(config: &CrawlerConfig) -> Result<(), ConfigError> {
    if config.max_pages < 1 {
        return Err(ConfigError::Validation(format!(
            "max_pages must be >= 1, got {}",
            config.max_pages
        )));
    }

    if config.concurrency < 1 || config.concurrency > MAX_CONCURRENCY {
        return Err(ConfigError::Validation(format!(
            "concurrency must be between 1 and {}, got {}",
            MAX_CONCURRENCY, config.concurrency
        )));
    }

    if config.navigation_timeout_ms < 100 {
        return Err(ConfigError::Validation(format!(
            "navigation_timeout_ms must be >= 100ms, got {}ms",
            config.navigation_timeout_ms
        )));
    }

    Ok(())
}

/// Validates render engine configuration
fn validate_render_config(config: &RenderConfig) -> Result<(), ConfigError> {
    if config.user_agent.trim().is_empty() {
        return Err(ConfigError::Validation(
            "user_agent cannot be empty".to_string(),
        ));
    }

    for name in &config.blocked_resource_types {
        if ResourceType::from_name(name).is_none() {
            return Err(ConfigError::Validation(format!(
                "Unknown resource type '{}' in blocked_resource_types",
                name
            )));
        }
    }

    Ok(())
}

/// Validates server configuration
fn validate_server_config(config: &ServerConfig) -> Result<(), ConfigError> {
    config.bind_address.parse::<SocketAddr>().map_err(|e| {
        ConfigError::InvalidUrl(format!(
            "Invalid bind_address '{}': {}",
            config.bind_address, e
        ))
    })?;

    Ok(())
}
