use crate::state::PageRecord;
use std::collections::BTreeSet;

/// Returns the unique page URLs of a sitemap, trimmed and sorted
pub fn list_pages(records: &[PageRecord]) -> Vec<String> {
    records
        .iter()
        .map(|record| record.url.trim().to_string())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}
