//! State module for crawl runs and their results
//!
//! # Components
//!
//! - `CrawlState`: Lifecycle of one crawl run (idle, running, draining, done)
//! - `PageRecord`: Extraction result for one crawled page
//! - `Heading`: One entry of a page's heading outline

mod crawl_state;
mod page_record;

// Re-export main types
pub use crawl_state::CrawlState;
pub use page_record::{Heading, PageRecord};
