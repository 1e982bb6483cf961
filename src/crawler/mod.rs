//! Crawler module for web page fetching and processing
//!
//! This module contains the core crawling logic, including:
//! - Page fetching over HTTP or through a headless browser
//! - HTML parsing and link extraction
//! - The frontier (visit queue with at-most-once visitation)
//! - Overall crawl coordination

mod coordinator;
mod fetcher;
mod frontier;
mod parser;
mod session;

pub use coordinator::{run_crawl, Coordinator};
pub use fetcher::{
    build_http_client, is_html_content_type, BrowserFetcher, FetchedPage, HttpFetcher,
    PageFetcher,
};
pub use frontier::Frontier;
pub use parser::{extract, ExtractedPage};
pub use session::{CrawlReport, CrawlSession, FailedPage, SkipReason, SkippedPage};
