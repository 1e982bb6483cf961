//! Site Crawler: a same-origin site mapper
//!
//! This crate crawls a website from a seed URL, stays within the seed's origin,
//! and extracts per-page titles, heading outlines and internal/external links.
//! An optional secondary pass captures full-page screenshots of every page.

pub mod browser;
pub mod config;
pub mod crawler;
pub mod output;
pub mod screenshot;
pub mod state;
pub mod url;

use thiserror::Error;

/// Main error type for crawl operations
#[derive(Debug, Error)]
pub enum CrawlError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Malformed URL: {0}")]
    MalformedUrl(#[from] UrlError),

    #[error("Fetch failed for {url}: {cause}")]
    FetchFailed { url: String, cause: String },

    #[error("HTML parse error for {url}: {message}")]
    ParseFailed { url: String, message: String },

    #[error("Screenshot failed for {url}: {cause}")]
    ScreenshotFailed { url: String, cause: String },

    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Invalid state transition: {from:?} -> {to:?}")]
    InvalidTransition {
        from: state::CrawlState,
        to: state::CrawlState,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl CrawlError {
    /// Returns true if the error makes further progress of the run impossible
    ///
    /// Every per-URL error is recovered locally by the coordinator; only
    /// resource-acquisition failures abort a run.
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::ResourceExhausted(_))
    }
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
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum UrlError {
    #[error("Empty URL")]
    Empty,

    #[error("Fragment-only reference: {0}")]
    FragmentOnly(String),

    #[error("Failed to parse URL: {0}")]
    Parse(String),

    #[error("Invalid URL scheme: {0}")]
    InvalidScheme(String),

    #[error("Missing host in URL: {0}")]
    MissingHost(String),
}

/// A crawl that stopped because of a fatal error
///
/// Carries whatever the run had collected before the error so the caller can
/// decide whether a partial sitemap is acceptable.
#[derive(Debug, Error)]
#[error("Crawl aborted: {error}")]
pub struct CrawlAborted {
    #[source]
    pub error: CrawlError,
    pub partial: crawler::CrawlReport,
}

/// Result type alias for crawl operations
pub type Result<T> = std::result::Result<T, CrawlError>;

// Re-export commonly used types
pub use config::Config;
pub use state::{CrawlState, Heading, PageRecord};
pub use crate::url::{canonicalize, classify_link, LinkClass, Origin};
