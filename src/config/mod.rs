//! Configuration module
//!
//! This module handles loading, parsing, and validating TOML configuration files.
//!
//! # Example
//!
//! ```no_run
//! use site_crawler::config::load_config;
//! use std::path::Path;
//!
//! let config = load_config(Path::new("crawl.toml")).unwrap();
//! println!("Politeness delay: {}ms", config.crawler.delay_ms);
//! ```

mod parser;
mod types;
mod validation;

// Re-export types
pub use types::{
    Config, CrawlerConfig, OutputConfig, Renderer, ScreenshotConfig, UserAgentConfig,
};

// Re-export parser functions
pub use parser::{load_config, parse_config};
pub use validation::{validate, validate_project_name};
