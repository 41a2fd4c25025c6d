//! Configuration module for Mailsweep
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//! Every section is optional; a missing file means [`Config::default`].
//!
//! # Example
//!
//! ```no_run
//! use mailsweep::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("mailsweep.toml")).unwrap();
//! println!("Crawler will visit at most {} pages", config.crawler.max_pages);
//! ```

mod parser;
mod types;
pub(crate) mod validation;

// Re-export types
pub use types::{Config, CrawlerConfig, RenderConfig, ServerConfig};

// Re-export parser functions
pub use parser::{compute_config_hash, load_config, load_config_with_hash};
pub use validation::validate;
