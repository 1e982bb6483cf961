//! Headless browser lifecycle
//!
//! A `BrowserSession` owns one Chromium process and the task driving its CDP
//! event handler. Both are released by `close`, and `Drop` stops the handler
//! task when a session is dropped on an error path without being closed.
//!
//! Tabs are handed out inside a `TabGuard`, which closes the tab when the
//! guard is dropped. Fetches and captures run under timeouts that drop their
//! futures mid-await, so closing cannot be left to code after the last await.

use crate::CrawlError;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::future::Future;
use std::ops::Deref;
use std::time::Duration;
use tokio::task::JoinHandle;

/// Launch options for the rendering engine
#[derive(Debug, Clone)]
pub struct BrowserOptions {
    pub viewport_width: u32,
    pub viewport_height: u32,
    pub user_agent: String,
    pub request_timeout: Duration,
}

/// One running Chromium instance
pub struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
}

impl BrowserSession {
    /// Launches Chromium
    ///
    /// # Returns
    ///
    /// * `Ok(BrowserSession)` - The browser is running
    /// * `Err(CrawlError::ResourceExhausted)` - The browser could not be started
    pub async fn launch(options: &BrowserOptions) -> Result<Self, CrawlError> {
        let config = BrowserConfig::builder()
            .window_size(options.viewport_width, options.viewport_height)
            .request_timeout(options.request_timeout)
            .arg("--no-sandbox")
            .arg("--disable-extensions")
            .arg("--disable-dev-shm-usage")
            .arg("--hide-scrollbars")
            .arg(format!("--user-agent={}", options.user_agent))
            .build()
            .map_err(|e| CrawlError::ResourceExhausted(format!("Browser config error: {}", e)))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| CrawlError::ResourceExhausted(format!("Browser launch failed: {}", e)))?;

        let handler = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if let Err(e) = event {
                    tracing::debug!("Browser handler error: {}", e);
                }
            }
            tracing::debug!("Browser event handler finished");
        });

        tracing::info!(
            "Browser launched ({}x{})",
            options.viewport_width,
            options.viewport_height
        );

        Ok(Self { browser, handler })
    }

    /// Opens a new tab on `url`
    pub async fn open(&self, url: &str) -> Result<TabGuard, chromiumoxide::error::CdpError> {
        self.browser.new_page(url).await.map(TabGuard::new)
    }

    /// Shuts the browser down and waits for the process to exit
    pub async fn close(mut self) {
        if let Err(e) = self.browser.close().await {
            tracing::warn!("Browser close error: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            tracing::warn!("Browser wait error: {}", e);
        }
        tracing::info!("Browser closed");
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
    }
}

/// Returns true if a CDP error means the browser connection itself is gone
pub fn is_connection_lost(error: &chromiumoxide::error::CdpError) -> bool {
    use chromiumoxide::error::CdpError;
    matches!(error, CdpError::Ws(_) | CdpError::ChannelSendError(_))
}

/// A browser resource that is released asynchronously
pub trait Release: Clone + Send + 'static {
    fn release(self) -> impl Future<Output = ()> + Send;
}

impl Release for Page {
    async fn release(self) {
        if let Err(e) = self.close().await {
            tracing::debug!("Failed to close tab: {}", e);
        }
    }
}

/// Open tab that is closed when the guard is dropped
///
/// The close runs on a spawned task, so it also happens when the owning
/// future is cancelled.
pub struct TabGuard<T: Release = Page> {
    tab: T,
}

impl<T: Release> TabGuard<T> {
    pub fn new(tab: T) -> Self {
        Self { tab }
    }
}

impl<T: Release> Deref for TabGuard<T> {
    type Target = T;

    fn deref(&self) -> &T {
        &self.tab
    }
}

impl<T: Release> Drop for TabGuard<T> {
    fn drop(&mut self) {
        match tokio::runtime::Handle::try_current() {
            Ok(runtime) => {
                runtime.spawn(self.tab.clone().release());
            }
            Err(_) => tracing::debug!("No runtime left to close tab"),
        }
    }
}
