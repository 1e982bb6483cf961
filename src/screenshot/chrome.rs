//! Full-page captures through headless Chromium

use crate::browser::{is_connection_lost, BrowserSession};
use crate::screenshot::Capturer;
use crate::CrawlError;
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::error::CdpError;
use chromiumoxide::page::ScreenshotParams;
use std::path::Path;
use std::sync::Arc;

/// Capturer backed by a shared browser session
#[derive(Clone)]
pub struct ChromeCapturer {
    session: Arc<BrowserSession>,
}

impl ChromeCapturer {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

impl Capturer for ChromeCapturer {
    async fn capture(&self, url: &str, path: &Path) -> Result<(), CrawlError> {
        let cdp_error = |e: CdpError| {
            if is_connection_lost(&e) {
                CrawlError::ResourceExhausted(format!("Browser connection lost: {}", e))
            } else {
                CrawlError::ScreenshotFailed {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
            }
        };

        // Dropping the guard closes the tab, also when the capture times out
        let tab = self.session.open(url).await.map_err(cdp_error)?;

        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .full_page(true)
            .build();

        tab.wait_for_navigation().await.map_err(cdp_error)?;
        let image = tab.screenshot(params).await;
        drop(tab);

        let bytes = image.map_err(cdp_error)?;
        tokio::fs::write(path, bytes)
            .await
            .map_err(|e| CrawlError::ScreenshotFailed {
                url: url.to_string(),
                cause: format!("failed to write {}: {}", path.display(), e),
            })
    }
}
