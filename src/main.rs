//! Site Crawler main entry point
//!
//! This is the command-line interface for the same-origin site crawler.

use anyhow::{Context, Result};
use clap::Parser;
use site_crawler::browser::{BrowserOptions, BrowserSession};
use site_crawler::config::{load_config, validate, Config, Renderer};
use site_crawler::crawler::{run_crawl, BrowserFetcher, CrawlReport, HttpFetcher};
use site_crawler::output::{
    list_pages, load_sitemap, print_summary, save_sitemap, write_outline, ProjectLayout,
};
use site_crawler::screenshot::{capture_all, CaptureSummary, ChromeCapturer};
use site_crawler::url::{canonicalize_seed, ExtensionFilter, Origin};
use site_crawler::CrawlAborted;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Site Crawler: maps every page of one website
///
/// Crawls a site from a seed URL without leaving its origin, records each
/// page's title, heading outline and links in a JSON sitemap, and can
/// capture a full-page screenshot of every page.
#[derive(Parser, Debug)]
#[command(name = "site-crawler")]
#[command(version = "1.0.0")]
#[command(about = "A same-origin site crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Override the seed URL from the config file
    #[arg(long, value_name = "URL")]
    seed: Option<String>,

    /// Override the project name from the config file
    #[arg(long, value_name = "NAME")]
    project: Option<String>,

    /// Skip the screenshot pass even if enabled in the config
    #[arg(long)]
    no_screenshots: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// List the pages of the project's existing sitemap and exit
    #[arg(long, conflicts_with_all = ["outline", "dry_run"])]
    list_pages: bool,

    /// Write an HTML outline from the project's existing sitemap and exit
    #[arg(long, conflicts_with_all = ["list_pages", "dry_run"])]
    outline: bool,

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with_all = ["list_pages", "outline"])]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Setup logging based on verbosity
    setup_logging(cli.verbose, cli.quiet);

    // Load and validate configuration
    tracing::info!("Loading configuration from: {}", cli.config.display());
    let mut config = load_config(&cli.config)
        .with_context(|| format!("Failed to load {}", cli.config.display()))?;
    apply_overrides(&mut config, &cli)?;

    let layout = ProjectLayout::new(
        Path::new(&config.output.projects_dir),
        &config.output.project_name,
    )?;

    // Handle different modes
    if cli.list_pages {
        handle_list_pages(&layout)
    } else if cli.outline {
        handle_outline(&layout, &config.output.project_name)
    } else if cli.dry_run {
        handle_dry_run(&config, &layout)
    } else {
        handle_crawl(config, layout).await
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        // Only show errors
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("site_crawler=info,warn"),
            1 => EnvFilter::new("site_crawler=debug,info"),
            2 => EnvFilter::new("site_crawler=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Applies command-line overrides and re-validates
fn apply_overrides(config: &mut Config, cli: &Cli) -> Result<()> {
    if let Some(seed) = &cli.seed {
        config.crawler.seed_url = seed.clone();
    }
    if let Some(project) = &cli.project {
        config.output.project_name = project.clone();
    }
    if cli.no_screenshots {
        config.screenshots.enabled = false;
    }

    validate(config).context("Invalid command-line override")?;
    Ok(())
}

/// Handles the --list-pages mode: prints the unique pages of a saved sitemap
fn handle_list_pages(layout: &ProjectLayout) -> Result<()> {
    let path = layout.sitemap_path();
    let records = load_sitemap(&path)
        .with_context(|| format!("Failed to read sitemap {}", path.display()))?;

    println!("Site Pages:");
    for page in list_pages(&records) {
        println!("- {}", page);
    }

    Ok(())
}

/// Handles the --outline mode: renders outline.html from a saved sitemap
fn handle_outline(layout: &ProjectLayout, project_name: &str) -> Result<()> {
    let path = layout.sitemap_path();
    let records = load_sitemap(&path)
        .with_context(|| format!("Failed to read sitemap {}", path.display()))?;

    write_outline(&records, project_name, &layout.outline_path())?;
    println!("✓ Outline written to: {}", layout.outline_path().display());

    Ok(())
}

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config, layout: &ProjectLayout) -> Result<()> {
    let seed = canonicalize_seed(&config.crawler.seed_url)?;
    let origin = Origin::of(&seed).context("Seed URL has no origin")?;
    let filter = ExtensionFilter::new(&config.crawler.denied_extensions);

    println!("=== Site Crawler Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", seed);
    println!("  Origin: {}", origin);
    println!("  Renderer: {:?}", config.crawler.renderer);
    println!("  Delay between fetches: {}ms", config.crawler.delay_ms);
    println!("  Fetch timeout: {}s", config.crawler.fetch_timeout_secs);
    println!(
        "  Max concurrent fetches: {}",
        config.crawler.max_concurrent_fetches
    );
    if let Some(limit) = config.crawler.max_run_secs {
        println!("  Run time limit: {}s", limit);
    }
    println!("  Denied extensions: {}", filter.len());

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    println!("  Project: {}", layout.root().display());
    println!("  Sitemap: {}", layout.sitemap_path().display());

    println!("\nScreenshots:");
    if config.screenshots.enabled {
        println!(
            "  Enabled ({}x{}, {}s per page)",
            config.screenshots.viewport_width,
            config.screenshots.viewport_height,
            config.screenshots.capture_timeout_secs
        );
        println!("  Images: {}", layout.image_dir().display());
    } else {
        println!("  Disabled");
    }

    println!("\n✓ Configuration is valid");

    Ok(())
}

/// Cancels `cancel` on Ctrl-C or when the run time limit elapses
fn spawn_cancel_triggers(cancel: &CancellationToken, max_run_secs: Option<u64>) {
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("Interrupt received, finishing in-flight work");
            on_signal.cancel();
        }
    });

    if let Some(secs) = max_run_secs {
        let on_timeout = cancel.clone();
        tokio::spawn(async move {
            tokio::select! {
                _ = tokio::time::sleep(Duration::from_secs(secs)) => {
                    tracing::warn!("Run time limit of {}s reached", secs);
                    on_timeout.cancel();
                }
                _ = on_timeout.cancelled() => {}
            }
        });
    }
}

fn browser_options(config: &Config) -> BrowserOptions {
    BrowserOptions {
        viewport_width: config.screenshots.viewport_width,
        viewport_height: config.screenshots.viewport_height,
        user_agent: config.user_agent.header_value(),
        request_timeout: Duration::from_secs(config.crawler.fetch_timeout_secs),
    }
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, layout: ProjectLayout) -> Result<()> {
    layout.create()?;

    let cancel = CancellationToken::new();
    spawn_cancel_triggers(&cancel, config.crawler.max_run_secs);

    let mut browser = match config.crawler.renderer {
        Renderer::Browser => Some(Arc::new(BrowserSession::launch(&browser_options(&config)).await?)),
        Renderer::Http => None,
    };

    // Run the crawler
    let result = match &browser {
        Some(session) => {
            let fetcher = BrowserFetcher::new(Arc::clone(session));
            run_crawl(&config.crawler, fetcher, cancel.clone()).await
        }
        None => {
            let timeout = Duration::from_secs(config.crawler.fetch_timeout_secs);
            let fetcher = HttpFetcher::new(&config.user_agent, timeout)?;
            run_crawl(&config.crawler, fetcher, cancel.clone()).await
        }
    };

    let (mut report, aborted) = match result {
        Ok(report) => (report, None),
        Err(CrawlAborted { error, partial }) => (partial, Some(error)),
    };

    let captures = if config.screenshots.enabled && aborted.is_none() && !cancel.is_cancelled() {
        capture_screenshots(&config, &layout, &mut report, &mut browser, &cancel).await
    } else {
        None
    };

    // The sitemap is written even for partial runs
    save_sitemap(&report.pages, &layout.sitemap_path())?;
    print_summary(&report, captures.as_ref());
    println!(
        "\nSite crawled and a sitemap generated: {}",
        layout.sitemap_path().display()
    );

    if let Some(session) = browser.take() {
        match Arc::try_unwrap(session) {
            Ok(session) => session.close().await,
            Err(_) => tracing::warn!("Browser still in use at shutdown"),
        }
    }

    match aborted {
        Some(error) => Err(anyhow::Error::new(error).context("Crawl aborted; partial sitemap saved")),
        None => Ok(()),
    }
}

/// Runs the screenshot pass, launching the browser if the crawl did not
async fn capture_screenshots(
    config: &Config,
    layout: &ProjectLayout,
    report: &mut CrawlReport,
    browser: &mut Option<Arc<BrowserSession>>,
    cancel: &CancellationToken,
) -> Option<CaptureSummary> {
    if browser.is_none() {
        match BrowserSession::launch(&browser_options(config)).await {
            Ok(session) => *browser = Some(Arc::new(session)),
            Err(e) => {
                tracing::error!("Skipping screenshots: {}", e);
                return None;
            }
        }
    }

    let session = Arc::clone(browser.as_ref()?);
    let capturer = ChromeCapturer::new(session);
    tracing::info!("Capturing screenshots of {} pages", report.pages.len());

    let summary = capture_all(
        &mut report.pages,
        &capturer,
        layout.image_dir(),
        Duration::from_secs(config.screenshots.capture_timeout_secs),
        cancel,
    )
    .await;

    Some(summary)
}
