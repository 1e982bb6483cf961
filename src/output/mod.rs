//! Output module for persisting and presenting crawl results
//!
//! This module handles:
//! - The per-project directory layout (`<projects-dir>/<slug>/img`)
//! - Saving and loading the JSON sitemap
//! - Listing crawled pages
//! - Rendering a static HTML outline
//! - Printing the run summary

mod outline;
mod pages;
mod project;
mod sitemap;
pub mod summary;

pub use outline::{render_outline, write_outline};
pub use pages::list_pages;
pub use project::{project_slug, ProjectLayout};
pub use sitemap::{load_sitemap, save_sitemap};
pub use summary::{format_summary, print_summary};

use thiserror::Error;

/// Errors that can occur during output operations
#[derive(Debug, Error)]
pub enum OutputError {
    #[error("Invalid project name '{0}': needs at least one letter or digit")]
    InvalidProject(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Sitemap JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for output operations
pub type OutputResult<T> = Result<T, OutputError>;
