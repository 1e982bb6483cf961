//! Screenshot pass
//!
//! Runs once over a finished crawl's records, in record order. Each page is
//! opened in a rendering engine and saved as a full-page PNG in the image
//! directory; the generated filename is written back to `PageRecord::image`.
//! A failed capture leaves `image` unset and the pass moves on.

mod chrome;
mod filename;

pub use chrome::ChromeCapturer;
pub use filename::generate_filename;

use crate::crawler::FailedPage;
use crate::state::PageRecord;
use crate::CrawlError;
use std::future::Future;
use std::path::Path;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// Renders a URL and writes a full-page image to `path`
pub trait Capturer: Send + Sync {
    fn capture(&self, url: &str, path: &Path) -> impl Future<Output = Result<(), CrawlError>> + Send;
}

/// Outcome of a screenshot pass
#[derive(Debug, Default)]
pub struct CaptureSummary {
    pub captured: usize,
    pub failures: Vec<FailedPage>,
    /// True if the pass stopped before the last record
    pub interrupted: bool,
}

/// Captures one record and assigns the filename to it
///
/// # Returns
///
/// * `Ok(filename)` - The image was written and `record.image` is set
/// * `Err(CrawlError)` - `ScreenshotFailed`, or `ResourceExhausted` when the
///   rendering engine is gone
pub async fn capture_page<C: Capturer>(
    record: &mut PageRecord,
    capturer: &C,
    image_dir: &Path,
    timeout: Duration,
) -> Result<String, CrawlError> {
    let filename = generate_filename();
    let path = image_dir.join(&filename);

    match tokio::time::timeout(timeout, capturer.capture(&record.url, &path)).await {
        Ok(Ok(())) => {
            record.image = Some(filename.clone());
            Ok(filename)
        }
        Ok(Err(e)) => Err(e),
        Err(_) => Err(CrawlError::ScreenshotFailed {
            url: record.url.clone(),
            cause: format!("timed out after {:?}", timeout),
        }),
    }
}

/// Captures every record in order
///
/// Stops early on cancellation or when the rendering engine is lost; the
/// records captured so far keep their filenames.
pub async fn capture_all<C: Capturer>(
    records: &mut [PageRecord],
    capturer: &C,
    image_dir: &Path,
    timeout: Duration,
    cancel: &CancellationToken,
) -> CaptureSummary {
    let mut summary = CaptureSummary::default();
    let total = records.len();

    for (index, record) in records.iter_mut().enumerate() {
        if cancel.is_cancelled() {
            tracing::info!("Screenshot pass cancelled after {} of {}", index, total);
            summary.interrupted = true;
            break;
        }

        match capture_page(record, capturer, image_dir, timeout).await {
            Ok(filename) => {
                tracing::info!("[{}/{}] Captured {} -> {}", index + 1, total, record.url, filename);
                summary.captured += 1;
            }
            Err(error) => {
                let fatal = error.is_fatal();
                if fatal {
                    tracing::error!("Screenshot pass stopped: {}", error);
                } else {
                    tracing::warn!("{}", error);
                }

                summary.failures.push(FailedPage {
                    url: record.url.clone(),
                    error,
                });

                if fatal {
                    summary.interrupted = true;
                    break;
                }
            }
        }
    }

    summary
}
