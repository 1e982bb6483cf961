//! Page fetchers
//!
//! This module retrieves raw markup for a URL, either over plain HTTP or by
//! rendering it in a headless browser. Fetchers report:
//! - the final URL after redirects
//! - the response's Content-Type
//! - the body, for HTML responses only
//!
//! Any non-2xx response or transport failure is `CrawlError::FetchFailed`.

use crate::browser::{is_connection_lost, BrowserSession};
use crate::config::UserAgentConfig;
use crate::CrawlError;
use chromiumoxide::cdp::browser_protocol::network::{EventResponseReceived, ResourceType};
use chromiumoxide::cdp::browser_protocol::page::FrameId;
use chromiumoxide::error::CdpError;
use chromiumoxide::listeners::EventStream;
use futures::{FutureExt, StreamExt};
use reqwest::{redirect::Policy, Client};
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Maximum redirect hops followed by the HTTP fetcher
const MAX_REDIRECTS: usize = 10;

/// A retrieved page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedPage {
    /// URL after redirects
    pub final_url: Url,

    /// Content-Type header value (may be empty)
    pub content_type: String,

    /// Markup; empty when the content type is not HTML
    pub body: String,
}

impl FetchedPage {
    /// Returns true if the content type indicates HTML
    pub fn is_html(&self) -> bool {
        is_html_content_type(&self.content_type)
    }
}

/// Returns true for `text/html` and `application/xhtml+xml` content types
pub fn is_html_content_type(content_type: &str) -> bool {
    let mime = content_type
        .split(';')
        .next()
        .unwrap_or("")
        .trim()
        .to_ascii_lowercase();
    mime == "text/html" || mime == "application/xhtml+xml"
}

/// Retrieves raw markup for a URL
pub trait PageFetcher: Send + Sync {
    fn fetch(&self, url: &Url) -> impl Future<Output = Result<FetchedPage, CrawlError>> + Send;
}

/// Builds an HTTP client with proper configuration
///
/// # Arguments
///
/// * `config` - The user agent configuration
/// * `timeout` - Whole-request timeout
///
/// # Returns
///
/// * `Ok(Client)` - Successfully built HTTP client
/// * `Err(reqwest::Error)` - Failed to build client
pub fn build_http_client(config: &UserAgentConfig, timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(config.header_value())
        .timeout(timeout)
        .connect_timeout(Duration::from_secs(10))
        .redirect(Policy::limited(MAX_REDIRECTS))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Fetcher that issues plain GET requests
#[derive(Debug, Clone)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    pub fn new(config: &UserAgentConfig, timeout: Duration) -> Result<Self, CrawlError> {
        let client = build_http_client(config, timeout)
            .map_err(|e| CrawlError::ResourceExhausted(format!("HTTP client build failed: {}", e)))?;
        Ok(Self { client })
    }
}

impl PageFetcher for HttpFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let failed = |cause: String| CrawlError::FetchFailed {
            url: url.to_string(),
            cause,
        };

        let response = self
            .client
            .get(url.clone())
            .send()
            .await
            .map_err(|e| failed(describe_reqwest_error(&e)))?;

        check_status(url, response.status().as_u16())?;

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_string();

        // Non-HTML bodies are never parsed, so skip the download
        if !is_html_content_type(&content_type) {
            return Ok(FetchedPage {
                final_url,
                content_type,
                body: String::new(),
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| failed(describe_reqwest_error(&e)))?;

        Ok(FetchedPage {
            final_url,
            content_type,
            body,
        })
    }
}

fn describe_reqwest_error(error: &reqwest::Error) -> String {
    if error.is_timeout() {
        "Request timeout".to_string()
    } else if error.is_connect() {
        format!("Connection failed: {}", error)
    } else if error.is_redirect() {
        format!("Redirect error: {}", error)
    } else {
        error.to_string()
    }
}

/// Fetcher that renders pages in a headless browser
///
/// Returns the rendered DOM as markup, so client-side content is included.
/// Status and content type come from the main document's network response,
/// so error pages and non-HTML documents are treated as over plain HTTP.
#[derive(Clone)]
pub struct BrowserFetcher {
    session: Arc<BrowserSession>,
}

impl BrowserFetcher {
    pub fn new(session: Arc<BrowserSession>) -> Self {
        Self { session }
    }
}

impl PageFetcher for BrowserFetcher {
    async fn fetch(&self, url: &Url) -> Result<FetchedPage, CrawlError> {
        let cdp_error = |e: CdpError| {
            if is_connection_lost(&e) {
                CrawlError::ResourceExhausted(format!("Browser connection lost: {}", e))
            } else {
                CrawlError::FetchFailed {
                    url: url.to_string(),
                    cause: e.to_string(),
                }
            }
        };

        // Listen before navigating so the document's response is not missed
        let tab = self.session.open("about:blank").await.map_err(cdp_error)?;
        let mut responses = tab
            .event_listener::<EventResponseReceived>()
            .await
            .map_err(cdp_error)?;

        tab.goto(url.as_str()).await.map_err(cdp_error)?;

        let main_frame = tab.mainframe().await.map_err(cdp_error)?;
        let document = document_response(&mut responses, main_frame.as_ref());

        let content_type = match document {
            Some((status, mime_type)) => {
                check_status(url, u16::try_from(status).unwrap_or(0))?;
                mime_type
            }
            None => tab
                .evaluate("document.contentType")
                .await
                .map_err(cdp_error)?
                .into_value::<String>()
                .unwrap_or_default(),
        };

        let final_url = tab
            .url()
            .await
            .map_err(cdp_error)?
            .and_then(|u| Url::parse(&u).ok())
            .unwrap_or_else(|| url.clone());

        if !is_html_content_type(&content_type) {
            return Ok(FetchedPage {
                final_url,
                content_type,
                body: String::new(),
            });
        }

        let body = tab.content().await.map_err(cdp_error)?;

        Ok(FetchedPage {
            final_url,
            content_type,
            body,
        })
    }
}

/// Finds the status and MIME type of the main frame's document among the
/// responses received so far
///
/// Redirect hops do not produce response events, so the match is the final
/// document.
fn document_response(
    responses: &mut EventStream<EventResponseReceived>,
    main_frame: Option<&FrameId>,
) -> Option<(i64, String)> {
    let mut found = None;
    while let Some(Some(event)) = responses.next().now_or_never() {
        let is_document = event.r#type == ResourceType::Document;
        let in_main_frame = main_frame.is_none() || event.frame_id.as_ref() == main_frame;
        if found.is_none() && is_document && in_main_frame {
            found = Some((event.response.status, event.response.mime_type.clone()));
        }
    }
    found
}

/// Maps a non-2xx status to `FetchFailed`
fn check_status(url: &Url, status: u16) -> Result<(), CrawlError> {
    if (200..300).contains(&status) {
        Ok(())
    } else {
        Err(CrawlError::FetchFailed {
            url: url.to_string(),
            cause: format!("HTTP {}", status),
        })
    }
}
