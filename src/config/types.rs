use crate::url::DEFAULT_DENIED_EXTENSIONS;
use serde::Deserialize;

/// Main configuration structure
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub crawler: CrawlerConfig,
    #[serde(rename = "user-agent")]
    pub user_agent: UserAgentConfig,
    pub output: OutputConfig,
    #[serde(default)]
    pub screenshots: ScreenshotConfig,
}

/// How pages are retrieved
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Renderer {
    /// Plain HTTP GET
    #[default]
    Http,
    /// Headless Chromium render
    Browser,
}

/// Crawler behavior configuration
#[derive(Debug, Clone, Deserialize)]
pub struct CrawlerConfig {
    /// Seed URL; `https://` is assumed when no scheme is given
    #[serde(rename = "seed-url")]
    pub seed_url: String,

    /// Minimum time between fetch launches (milliseconds)
    #[serde(rename = "delay-ms", default = "default_delay_ms")]
    pub delay_ms: u64,

    /// Per-fetch timeout (seconds)
    #[serde(rename = "fetch-timeout-secs", default = "default_fetch_timeout_secs")]
    pub fetch_timeout_secs: u64,

    /// Maximum number of fetches in flight
    #[serde(rename = "max-concurrent-fetches", default = "default_max_concurrent_fetches")]
    pub max_concurrent_fetches: u32,

    #[serde(default)]
    pub renderer: Renderer,

    /// Same-origin links with these extensions are not crawled
    #[serde(rename = "denied-extensions", default = "default_denied_extensions")]
    pub denied_extensions: Vec<String>,

    /// Cancel the run after this many seconds
    #[serde(rename = "max-run-secs", default)]
    pub max_run_secs: Option<u64>,
}

/// User agent identification configuration
#[derive(Debug, Clone, Deserialize)]
pub struct UserAgentConfig {
    /// Name of the crawler
    #[serde(rename = "crawler-name")]
    pub crawler_name: String,

    /// Version of the crawler
    #[serde(rename = "crawler-version")]
    pub crawler_version: String,
}

impl UserAgentConfig {
    /// Formats the User-Agent header value: `Name/Version`
    pub fn header_value(&self) -> String {
        format!("{}/{}", self.crawler_name, self.crawler_version)
    }
}

/// Output configuration
#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    /// Directory holding one subdirectory per project
    #[serde(rename = "projects-dir", default = "default_projects_dir")]
    pub projects_dir: String,

    /// Human-readable project name; slugified for the directory name
    #[serde(rename = "project-name")]
    pub project_name: String,
}

/// Screenshot pass configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ScreenshotConfig {
    #[serde(default)]
    pub enabled: bool,

    #[serde(rename = "viewport-width", default = "default_viewport_width")]
    pub viewport_width: u32,

    #[serde(rename = "viewport-height", default = "default_viewport_height")]
    pub viewport_height: u32,

    /// Per-page capture timeout (seconds)
    #[serde(rename = "capture-timeout-secs", default = "default_capture_timeout_secs")]
    pub capture_timeout_secs: u64,
}

impl Default for ScreenshotConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            viewport_width: default_viewport_width(),
            viewport_height: default_viewport_height(),
            capture_timeout_secs: default_capture_timeout_secs(),
        }
    }
}

fn default_delay_ms() -> u64 {
    1000
}

fn default_fetch_timeout_secs() -> u64 {
    30
}

fn default_max_concurrent_fetches() -> u32 {
    1
}

fn default_denied_extensions() -> Vec<String> {
    DEFAULT_DENIED_EXTENSIONS.iter().map(|e| e.to_string()).collect()
}

fn default_projects_dir() -> String {
    "projects".to_string()
}

fn default_viewport_width() -> u32 {
    1280
}

fn default_viewport_height() -> u32 {
    800
}

fn default_capture_timeout_secs() -> u64 {
    60
}
