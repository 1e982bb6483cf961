//! Sitemap persistence
//!
//! The sitemap is a JSON array of page records with the fields
//! `title, url, headings[{level, text}], internalLinks, externalLinks, image?`.
//! Report consumers read it as-is.

use crate::output::OutputResult;
use crate::state::PageRecord;
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;

/// Writes the records to `path`, replacing any previous sitemap
///
/// # Arguments
///
/// * `records` - Page records in crawl order
/// * `path` - Destination file
///
/// # Returns
///
/// * `Ok(())` - Successfully wrote the sitemap
/// * `Err(OutputError)` - Failed to create or write the file
pub fn save_sitemap(records: &[PageRecord], path: &Path) -> OutputResult<()> {
    let mut writer = BufWriter::new(File::create(path)?);
    serde_json::to_writer(&mut writer, records)?;
    writer.flush()?;

    tracing::info!("Wrote {} pages to {}", records.len(), path.display());
    Ok(())
}

/// Reads a sitemap written by `save_sitemap`
pub fn load_sitemap(path: &Path) -> OutputResult<Vec<PageRecord>> {
    let reader = BufReader::new(File::open(path)?);
    Ok(serde_json::from_reader(reader)?)
}
