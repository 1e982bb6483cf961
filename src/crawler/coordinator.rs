//! Crawler coordinator - main crawl orchestration logic
//!
//! This module contains the main crawl loop that coordinates all aspects of
//! the crawling process, including:
//! - Seeding the frontier and driving the run's state machine
//! - Launching fetches on a bounded worker pool with a pacing delay
//! - Folding fetch results back into the session (records, links, failures)
//! - Handling cancellation and fatal errors
//!
//! The coordinator is the only owner of the session and its frontier. Workers
//! receive a URL and hand back an outcome; they never touch shared state, so
//! no URL can be dequeued twice or enqueued while pending.

use crate::config::CrawlerConfig;
use crate::crawler::fetcher::PageFetcher;
use crate::crawler::parser::{extract, ExtractedPage};
use crate::crawler::session::{CrawlReport, CrawlSession, SkipReason};
use crate::state::CrawlState;
use crate::url::{canonicalize_seed, ExtensionFilter};
use crate::{CrawlAborted, CrawlError};
use futures::FutureExt;
use std::any::Any;
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinSet;
use tokio::time::{sleep_until, Instant};
use tokio_util::sync::CancellationToken;
use url::Url;

/// What a worker learned about one URL
#[derive(Debug)]
enum FetchOutcome {
    /// HTML page, parsed
    Page {
        final_url: Url,
        extracted: ExtractedPage,
    },
    /// Fetched, but not HTML
    NotHtml { content_type: String },
}

/// Main crawler coordinator structure
pub struct Coordinator<F> {
    session: CrawlSession,
    fetcher: Arc<F>,
    delay: Duration,
    fetch_timeout: Duration,
    max_concurrent: usize,
    cancel: CancellationToken,
}

impl<F: PageFetcher + 'static> Coordinator<F> {
    /// Creates a new coordinator instance
    ///
    /// # Arguments
    ///
    /// * `config` - The crawler configuration
    /// * `fetcher` - Page fetcher used by every worker
    /// * `cancel` - Token that stops the run early when cancelled
    ///
    /// # Returns
    ///
    /// * `Ok(Coordinator)` - Successfully created coordinator
    /// * `Err(CrawlError::MalformedUrl)` - The seed URL is unusable
    pub fn new(
        config: &CrawlerConfig,
        fetcher: F,
        cancel: CancellationToken,
    ) -> Result<Self, CrawlError> {
        let seed = canonicalize_seed(&config.seed_url)?;
        let filter = ExtensionFilter::new(&config.denied_extensions);
        let session = CrawlSession::new(seed, filter)?;

        Ok(Self {
            session,
            fetcher: Arc::new(fetcher),
            delay: Duration::from_millis(config.delay_ms),
            fetch_timeout: Duration::from_secs(config.fetch_timeout_secs),
            max_concurrent: config.max_concurrent_fetches.max(1) as usize,
            cancel,
        })
    }

    /// Runs the main crawl loop until the frontier drains or the run is cancelled
    ///
    /// The run is done only when nothing is pending and no fetch is in
    /// flight, since an in-flight fetch may still discover new URLs. After
    /// cancellation no new fetch starts; fetches already in flight complete
    /// and their results are kept.
    ///
    /// # Returns
    ///
    /// * `Ok(CrawlReport)` - The run finished or was cancelled
    /// * `Err(CrawlAborted)` - A fatal error stopped the run; carries the
    ///   partial report
    pub async fn run(mut self) -> Result<CrawlReport, CrawlAborted> {
        let start_time = std::time::Instant::now();
        tracing::info!(
            "Starting crawl of {} ({} concurrent, {:?} between fetches)",
            self.session.origin(),
            self.max_concurrent,
            self.delay
        );

        if let Err(error) = self.session.start() {
            return Err(self.abort(error, false, start_time));
        }

        let mut workers: JoinSet<(Url, Result<FetchOutcome, CrawlError>)> = JoinSet::new();
        let mut next_launch = Instant::now();
        let mut cancelled = false;

        loop {
            if self.session.state() == CrawlState::Running && self.cancel.is_cancelled() {
                tracing::info!(
                    "Crawl cancelled, waiting for {} in-flight fetches",
                    workers.len()
                );
                cancelled = true;
                if let Err(error) = self.session.transition(CrawlState::Draining) {
                    workers.shutdown().await;
                    return Err(self.abort(error, cancelled, start_time));
                }
            }

            let can_launch = self.session.has_pending() && workers.len() < self.max_concurrent;
            if !can_launch && workers.is_empty() {
                break;
            }

            let accepting = self.session.state().accepts_fetches();

            tokio::select! {
                biased;

                _ = self.cancel.cancelled(), if accepting => {}

                Some(joined) = workers.join_next(), if !workers.is_empty() => {
                    let (url, result) = match joined {
                        Ok(done) => done,
                        Err(e) => {
                            tracing::error!("Fetch worker failed: {}", e);
                            continue;
                        }
                    };

                    match result {
                        Ok(FetchOutcome::Page { final_url, extracted }) => {
                            self.session.record_page(&url, &final_url, extracted);
                        }
                        Ok(FetchOutcome::NotHtml { content_type }) => {
                            self.session.record_skipped(&url, SkipReason::NotHtml(content_type));
                        }
                        Err(error) if error.is_fatal() => {
                            tracing::error!("Fatal error while fetching {}: {}", url, error);
                            workers.shutdown().await;
                            return Err(self.abort(error, cancelled, start_time));
                        }
                        Err(error) => self.session.record_failure(&url, error),
                    }

                    // The pause runs from the end of the previous fetch
                    next_launch = next_launch.max(Instant::now() + self.delay);
                }

                _ = sleep_until(next_launch), if can_launch => {
                    if let Some(url) = self.session.next_url() {
                        tracing::debug!("Fetching {}", url);
                        workers.spawn(fetch_page(
                            Arc::clone(&self.fetcher),
                            url,
                            self.fetch_timeout,
                        ));
                        next_launch = Instant::now() + self.delay;
                    }
                }

                else => break,
            }
        }

        let elapsed = start_time.elapsed();
        let report = self.session.finish(cancelled, elapsed);
        tracing::info!(
            "Crawl completed: {} pages, {} failures, {} skipped in {:?}",
            report.pages.len(),
            report.failures.len(),
            report.skipped.len(),
            elapsed
        );

        Ok(report)
    }

    fn abort(self, error: CrawlError, cancelled: bool, start_time: std::time::Instant) -> CrawlAborted {
        let partial = self.session.finish(cancelled, start_time.elapsed());
        tracing::error!(
            "Crawl aborted after {} pages: {}",
            partial.pages.len(),
            error
        );
        CrawlAborted { error, partial }
    }
}

/// Fetches and parses one URL; runs on a worker task
///
/// A panic in the fetcher or the parser becomes a `FetchFailed` for the URL,
/// so every spawned URL comes back to the coordinator.
async fn fetch_page<F: PageFetcher>(
    fetcher: Arc<F>,
    url: Url,
    timeout: Duration,
) -> (Url, Result<FetchOutcome, CrawlError>) {
    let result = AssertUnwindSafe(fetch_and_parse(fetcher.as_ref(), &url, timeout))
        .catch_unwind()
        .await
        .unwrap_or_else(|panic| {
            Err(CrawlError::FetchFailed {
                url: url.to_string(),
                cause: format!("worker panicked: {}", panic_message(&*panic)),
            })
        });

    (url, result)
}

async fn fetch_and_parse<F: PageFetcher>(
    fetcher: &F,
    url: &Url,
    timeout: Duration,
) -> Result<FetchOutcome, CrawlError> {
    match tokio::time::timeout(timeout, fetcher.fetch(url)).await {
        Ok(Ok(page)) if page.is_html() => extract(&page.body, url.as_str()).map(|extracted| {
            FetchOutcome::Page {
                final_url: page.final_url,
                extracted,
            }
        }),
        Ok(Ok(page)) => Ok(FetchOutcome::NotHtml {
            content_type: page.content_type,
        }),
        Ok(Err(e)) => Err(e),
        Err(_) => Err(CrawlError::FetchFailed {
            url: url.to_string(),
            cause: format!("timed out after {:?}", timeout),
        }),
    }
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(message) = payload.downcast_ref::<&str>() {
        message
    } else if let Some(message) = payload.downcast_ref::<String>() {
        message
    } else {
        "unknown panic"
    }
}

/// Runs the main crawl operation
///
/// # Arguments
///
/// * `config` - The crawler configuration
/// * `fetcher` - Page fetcher (HTTP or browser)
/// * `cancel` - Cancellation token
///
/// # Returns
///
/// * `Ok(CrawlReport)` - Crawl completed or was cancelled
/// * `Err(CrawlAborted)` - Crawl stopped on a fatal error
///
/// # Example
///
/// ```no_run
/// use site_crawler::config::load_config;
/// use site_crawler::crawler::{run_crawl, HttpFetcher};
/// use std::path::Path;
/// use std::time::Duration;
/// use tokio_util::sync::CancellationToken;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = load_config(Path::new("crawl.toml"))?;
/// let fetcher = HttpFetcher::new(&config.user_agent, Duration::from_secs(30))?;
/// let report = run_crawl(&config.crawler, fetcher, CancellationToken::new()).await?;
/// println!("{} pages", report.pages.len());
/// # Ok(())
/// # }
/// ```
pub async fn run_crawl<F: PageFetcher + 'static>(
    config: &CrawlerConfig,
    fetcher: F,
    cancel: CancellationToken,
) -> Result<CrawlReport, CrawlAborted> {
    let coordinator = Coordinator::new(config, fetcher, cancel).map_err(|error| CrawlAborted {
        error,
        partial: CrawlReport::default(),
    })?;
    coordinator.run().await
}
