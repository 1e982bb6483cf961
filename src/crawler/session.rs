//! Per-run crawl state
//!
//! `CrawlSession` bundles everything one run mutates: the origin, the
//! frontier, the lifecycle state and the collected results. The coordinator
//! owns exactly one session, so independent runs never share state.

use crate::crawler::frontier::Frontier;
use crate::crawler::parser::ExtractedPage;
use crate::state::{CrawlState, PageRecord};
use crate::url::{classify_link, ExtensionFilter, LinkClass, Origin};
use crate::{CrawlError, UrlError};
use std::fmt;
use std::time::Duration;
use url::Url;

/// A URL whose fetch or parse failed
#[derive(Debug)]
pub struct FailedPage {
    pub url: String,
    pub error: CrawlError,
}

/// Why a fetched URL produced no record
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// The response was not HTML; carries the content type
    NotHtml(String),
    /// A redirect left the crawl origin; carries the final URL
    OffOriginRedirect(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotHtml(content_type) if content_type.is_empty() => {
                write!(f, "not HTML (no content type)")
            }
            Self::NotHtml(content_type) => write!(f, "not HTML ({})", content_type),
            Self::OffOriginRedirect(target) => write!(f, "redirected off-origin to {}", target),
        }
    }
}

/// A URL that was fetched but skipped
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedPage {
    pub url: String,
    pub reason: SkipReason,
}

/// Result of one crawl run
#[derive(Debug, Default)]
pub struct CrawlReport {
    /// Crawl origin, e.g. `https://example.com`
    pub origin: String,

    /// One record per successfully crawled page, in completion order
    pub pages: Vec<PageRecord>,

    pub failures: Vec<FailedPage>,

    pub skipped: Vec<SkippedPage>,

    /// Links dropped by classification (schemes, anchors, extensions, malformed)
    pub excluded_links: usize,

    /// True if the run stopped early on request
    pub cancelled: bool,

    pub elapsed: Duration,
}

/// Mutable state of one crawl run
#[derive(Debug)]
pub struct CrawlSession {
    origin: Origin,
    seed: Url,
    filter: ExtensionFilter,
    frontier: Frontier,
    state: CrawlState,
    pages: Vec<PageRecord>,
    failures: Vec<FailedPage>,
    skipped: Vec<SkippedPage>,
    excluded_links: usize,
}

impl CrawlSession {
    /// Creates a session rooted at an already canonical seed URL
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlSession)` - Session in the `Idle` state
    /// * `Err(CrawlError::MalformedUrl)` - The seed has no origin
    pub fn new(seed: Url, filter: ExtensionFilter) -> Result<Self, CrawlError> {
        let origin =
            Origin::of(&seed).ok_or_else(|| UrlError::MissingHost(seed.to_string()))?;

        Ok(Self {
            origin,
            seed,
            filter,
            frontier: Frontier::new(),
            state: CrawlState::Idle,
            pages: Vec::new(),
            failures: Vec::new(),
            skipped: Vec::new(),
            excluded_links: 0,
        })
    }

    pub fn origin(&self) -> &Origin {
        &self.origin
    }

    pub fn state(&self) -> CrawlState {
        self.state
    }

    pub fn frontier(&self) -> &Frontier {
        &self.frontier
    }

    pub fn pages(&self) -> &[PageRecord] {
        &self.pages
    }

    /// Moves to `to`, rejecting transitions the lifecycle does not allow
    pub fn transition(&mut self, to: CrawlState) -> Result<(), CrawlError> {
        if !self.state.can_transition_to(to) {
            return Err(CrawlError::InvalidTransition {
                from: self.state,
                to,
            });
        }

        tracing::debug!("Crawl state {} -> {}", self.state, to);
        self.state = to;
        Ok(())
    }

    /// Enqueues the seed and enters `Running`
    pub fn start(&mut self) -> Result<(), CrawlError> {
        self.transition(CrawlState::Running)?;
        self.frontier.enqueue(self.seed.clone());
        Ok(())
    }

    /// Hands out the next URL to fetch, if the run still accepts fetches
    pub fn next_url(&mut self) -> Option<Url> {
        if !self.state.accepts_fetches() {
            return None;
        }
        self.frontier.dequeue_one()
    }

    /// Returns true if a URL is ready to be handed out
    pub fn has_pending(&self) -> bool {
        self.state.accepts_fetches() && !self.frontier.is_empty()
    }

    /// Records a successfully fetched and parsed page
    ///
    /// Links are resolved against the page's `<base href>` (itself resolved
    /// against `final_url`), or `final_url` when there is none. A redirect
    /// that left the origin yields a skip instead of a record.
    ///
    /// Returns the record that was appended, if any.
    pub fn record_page(
        &mut self,
        requested: &Url,
        final_url: &Url,
        extracted: ExtractedPage,
    ) -> Option<&PageRecord> {
        self.frontier.mark_visited(requested);

        if !self.origin.contains(final_url) {
            tracing::warn!("{} redirected off-origin to {}, skipping", requested, final_url);
            self.record_skipped(
                requested,
                SkipReason::OffOriginRedirect(final_url.to_string()),
            );
            return None;
        }

        // A same-origin redirect target is the same document
        if final_url != requested {
            if let Ok(target) = crate::url::canonicalize(final_url.as_str(), final_url) {
                self.frontier.mark_visited(&target);
            }
        }

        let base = effective_base(final_url, &extracted.base_href);
        let mut record = PageRecord::new(requested.as_str(), extracted.title, extracted.headings);

        for href in &extracted.anchor_hrefs {
            match classify_link(href, &base, &self.origin, &self.filter) {
                LinkClass::Internal(url) => {
                    record.add_internal_link(url.as_str());
                    if self.frontier.enqueue(url) {
                        tracing::trace!("Queued {}", href);
                    }
                }
                LinkClass::External(url) => {
                    record.add_external_link(url);
                }
                LinkClass::Excluded(reason) => {
                    tracing::debug!("Excluded link '{}' on {}: {}", href, requested, reason);
                    self.excluded_links += 1;
                }
            }
        }

        tracing::info!(
            "Crawled {} \"{}\" ({} internal, {} external links)",
            record.url,
            record.title,
            record.internal_links.len(),
            record.external_links.len()
        );

        self.pages.push(record);
        self.pages.last()
    }

    /// Records a fetched URL that produced no record
    pub fn record_skipped(&mut self, url: &Url, reason: SkipReason) {
        self.frontier.mark_visited(url);
        tracing::info!("Skipped {}: {}", url, reason);
        self.skipped.push(SkippedPage {
            url: url.to_string(),
            reason,
        });
    }

    /// Records a per-URL failure; the URL is never retried in this run
    pub fn record_failure(&mut self, url: &Url, error: CrawlError) {
        self.frontier.mark_visited(url);
        tracing::warn!("{}", error);
        self.failures.push(FailedPage {
            url: url.to_string(),
            error,
        });
    }

    /// Enters `Done` and returns everything collected
    pub fn finish(mut self, cancelled: bool, elapsed: Duration) -> CrawlReport {
        if !self.state.is_terminal() {
            tracing::debug!("Crawl state {} -> {}", self.state, CrawlState::Done);
            self.state = CrawlState::Done;
        }

        if !self.frontier.is_quiescent() {
            tracing::info!(
                "{} URLs left unfetched, {} still in flight",
                self.frontier.pending_len(),
                self.frontier.in_flight_len()
            );
        }
        tracing::debug!("{} URLs visited", self.frontier.visited_len());

        CrawlReport {
            origin: self.origin.to_string(),
            pages: self.pages,
            failures: self.failures,
            skipped: self.skipped,
            excluded_links: self.excluded_links,
            cancelled,
            elapsed,
        }
    }
}

/// Resolves a page's `<base href>` against its URL
///
/// An empty or unresolvable base falls back to the page URL.
fn effective_base(page_url: &Url, base_href: &str) -> Url {
    if base_href.is_empty() {
        return page_url.clone();
    }
    page_url.join(base_href).unwrap_or_else(|_| page_url.clone())
}
