//! Run summary
//!
//! Formats the outcome of a crawl (and the optional screenshot pass) for
//! display on stdout.

use crate::crawler::CrawlReport;
use crate::screenshot::CaptureSummary;
use std::fmt::Write as _;

/// Formats the run summary
///
/// # Arguments
///
/// * `report` - The crawl report
/// * `captures` - Screenshot pass outcome, if the pass ran
///
/// # Returns
///
/// A multi-line summary
pub fn format_summary(report: &CrawlReport, captures: Option<&CaptureSummary>) -> String {
    let mut out = String::new();

    let _ = writeln!(out, "=== Crawl Summary ===\n");

    let _ = writeln!(out, "Overview:");
    let _ = writeln!(out, "  Origin: {}", report.origin);
    let status = if report.cancelled { "cancelled" } else { "complete" };
    let _ = writeln!(out, "  Status: {}", status);
    let _ = writeln!(out, "  Duration: {:.1}s", report.elapsed.as_secs_f64());
    let _ = writeln!(out, "  Pages crawled: {}", report.pages.len());
    let _ = writeln!(out, "  Failed: {}", report.failures.len());
    let _ = writeln!(out, "  Skipped: {}", report.skipped.len());
    let _ = writeln!(out, "  Excluded links: {}", report.excluded_links);

    let external: usize = report.pages.iter().map(|p| p.external_links.len()).sum();
    let _ = writeln!(out, "  External links: {}", external);
    out.push('\n');

    if !report.failures.is_empty() {
        let _ = writeln!(out, "Failures ({}):", report.failures.len());
        for failure in &report.failures {
            let _ = writeln!(out, "  - {}", failure.error);
        }
        out.push('\n');
    }

    if !report.skipped.is_empty() {
        let _ = writeln!(out, "Skipped ({}):", report.skipped.len());
        for skipped in &report.skipped {
            let _ = writeln!(out, "  - {}: {}", skipped.url, skipped.reason);
        }
        out.push('\n');
    }

    if let Some(captures) = captures {
        let _ = writeln!(out, "Screenshots:");
        let _ = writeln!(out, "  Captured: {}", captures.captured);
        let _ = writeln!(out, "  Failed: {}", captures.failures.len());
        if captures.interrupted {
            let _ = writeln!(out, "  Pass stopped early");
        }
        for failure in &captures.failures {
            let _ = writeln!(out, "  - {}", failure.error);
        }
        out.push('\n');
    }

    let attempted = report.pages.len() + report.failures.len();
    let success_rate = if attempted > 0 {
        (report.pages.len() as f64 / attempted as f64) * 100.0
    } else {
        0.0
    };

    let _ = write!(
        out,
        "Success Rate: {:.1}% ({} / {} pages successfully crawled)",
        success_rate,
        report.pages.len(),
        attempted
    );

    out
}

/// Prints the run summary to stdout
pub fn print_summary(report: &CrawlReport, captures: Option<&CaptureSummary>) {
    println!("{}", format_summary(report, captures));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crawler::{FailedPage, SkipReason, SkippedPage};
    use crate::state::PageRecord;
    use crate::CrawlError;
    use std::time::Duration;

    fn report() -> CrawlReport {
        let mut home = PageRecord::new("https://site.test/", "Home", Vec::new());
        home.add_external_link("https://ext.test/");

        CrawlReport {
            origin: "https://site.test".to_string(),
            pages: vec![
                home,
                PageRecord::new("https://site.test/about", "About", Vec::new()),
                PageRecord::new("https://site.test/news", "News", Vec::new()),
            ],
            failures: vec![FailedPage {
                url: "https://site.test/broken".to_string(),
                error: CrawlError::FetchFailed {
                    url: "https://site.test/broken".to_string(),
                    cause: "HTTP 500".to_string(),
                },
            }],
            skipped: vec![SkippedPage {
                url: "https://site.test/feed".to_string(),
                reason: SkipReason::NotHtml("application/rss+xml".to_string()),
            }],
            excluded_links: 4,
            cancelled: false,
            elapsed: Duration::from_millis(2500),
        }
    }

    #[test]
    fn test_summary_counts() {
        let text = format_summary(&report(), None);

        assert!(text.contains("Origin: https://site.test"));
        assert!(text.contains("Status: complete"));
        assert!(text.contains("Duration: 2.5s"));
        assert!(text.contains("Pages crawled: 3"));
        assert!(text.contains("Failed: 1"));
        assert!(text.contains("Excluded links: 4"));
        assert!(text.contains("External links: 1"));
        assert!(text.contains("Fetch failed for https://site.test/broken: HTTP 500"));
        assert!(text.contains("https://site.test/feed: not HTML (application/rss+xml)"));
        assert!(text.contains("Success Rate: 75.0% (3 / 4 pages successfully crawled)"));
        assert!(!text.contains("Screenshots:"));
    }

    #[test]
    fn test_summary_with_captures() {
        let captures = CaptureSummary {
            captured: 2,
            failures: vec![FailedPage {
                url: "https://site.test/news".to_string(),
                error: CrawlError::ScreenshotFailed {
                    url: "https://site.test/news".to_string(),
                    cause: "timed out after 60s".to_string(),
                },
            }],
            interrupted: false,
        };

        let text = format_summary(&report(), Some(&captures));
        assert!(text.contains("Screenshots:"));
        assert!(text.contains("Captured: 2"));
        assert!(text.contains("Screenshot failed for https://site.test/news"));
    }

    #[test]
    fn test_empty_report() {
        let empty = CrawlReport {
            cancelled: true,
            ..Default::default()
        };

        let text = format_summary(&empty, None);
        assert!(text.contains("Status: cancelled"));
        assert!(text.contains("Success Rate: 0.0% (0 / 0 pages successfully crawled)"));
    }
}
