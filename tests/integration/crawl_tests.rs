//! Integration tests for the crawler
//!
//! These tests use wiremock to create mock HTTP servers and test
//! the full crawl cycle end-to-end over real HTTP.

use site_crawler::config::{CrawlerConfig, Renderer, UserAgentConfig};
use site_crawler::crawler::{run_crawl, CrawlReport, HttpFetcher, SkipReason};
use site_crawler::output::{list_pages, load_sitemap, save_sitemap, ProjectLayout};
use site_crawler::CrawlError;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use wiremock::matchers::{header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Creates a crawler configuration seeded at `seed`
fn create_test_config(seed: &str) -> CrawlerConfig {
    CrawlerConfig {
        seed_url: seed.to_string(),
        delay_ms: 10, // Very short for testing
        fetch_timeout_secs: 5,
        max_concurrent_fetches: 1,
        renderer: Renderer::Http,
        denied_extensions: vec!["pdf".to_string(), "png".to_string()],
        max_run_secs: None,
    }
}

fn user_agent() -> UserAgentConfig {
    UserAgentConfig {
        crawler_name: "TestBot".to_string(),
        crawler_version: "1.0.0".to_string(),
    }
}

fn html(body: &str) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_raw(body.as_bytes().to_vec(), "text/html; charset=utf-8")
}

async fn mount_page(server: &MockServer, route: &str, body: &str) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(html(body))
        .expect(1)
        .mount(server)
        .await;
}

async fn crawl(config: &CrawlerConfig) -> CrawlReport {
    let fetcher = HttpFetcher::new(
        &user_agent(),
        Duration::from_secs(config.fetch_timeout_secs),
    )
    .expect("Failed to build fetcher");

    run_crawl(config, fetcher, CancellationToken::new())
        .await
        .expect("Crawl aborted")
}

fn page_urls(report: &CrawlReport) -> Vec<&str> {
    report.pages.iter().map(|p| p.url.as_str()).collect()
}

#[tokio::test]
async fn test_end_to_end_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r##"<html><head><title>Welcome</title></head><body>
            <h1>Welcome</h1>
            <a href="/about">About</a>
            <a href="https://ext.test/">Elsewhere</a>
            <a href="#top">Top</a>
        </body></html>"##,
    )
    .await;
    mount_page(
        &mock_server,
        "/about",
        "<html><head><title>About</title></head><body><h2>Who</h2></body></html>",
    )
    .await;

    let report = crawl(&create_test_config(&format!("{}/", base_url))).await;

    let root_url = format!("{}/", base_url);
    let about_url = format!("{}/about", base_url);
    assert_eq!(page_urls(&report), vec![root_url.as_str(), about_url.as_str()]);

    let root = &report.pages[0];
    assert_eq!(root.title, "Welcome");
    assert_eq!(root.headings.len(), 1);
    assert_eq!(root.headings[0].level, 1);
    assert_eq!(root.headings[0].text, "Welcome");
    assert_eq!(root.internal_links, vec![about_url.clone()]);
    assert_eq!(root.external_links, vec!["https://ext.test/".to_string()]);

    let about = &report.pages[1];
    assert_eq!(about.headings[0].level, 2);
    assert!(about.internal_links.is_empty());

    assert!(report.failures.is_empty());
    assert_eq!(report.excluded_links, 1);
}

#[tokio::test]
async fn test_cyclic_links_fetched_once() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    // Absolute, relative, query and fragment variants of the same pages
    mount_page(
        &mock_server,
        "/",
        &format!(r#"<a href="{}/a">A</a><a href="b">B</a>"#, base_url),
    )
    .await;
    mount_page(
        &mock_server,
        "/a",
        r#"<a href="/">Home</a><a href="/b?from=a">B</a><a href="./a#self">A</a>"#,
    )
    .await;
    mount_page(
        &mock_server,
        "/b",
        r#"<a href="/a">A</a><a href="/?utm=x#top">Home</a>"#,
    )
    .await;

    let report = crawl(&create_test_config(&base_url)).await;

    assert_eq!(report.pages.len(), 3);
    assert!(report.failures.is_empty());
    // Mock expectations (exactly one GET per page) are verified on drop
}

#[tokio::test]
async fn test_failed_page_does_not_stop_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/broken">Broken</a><a href="/missing">Missing</a><a href="/ok">OK</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/broken"))
        .respond_with(ResponseTemplate::new(500))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/ok", "<title>OK</title>").await;

    let report = crawl(&create_test_config(&base_url)).await;

    let ok_url = format!("{}/ok", base_url);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.pages[1].url, ok_url);

    assert_eq!(report.failures.len(), 2);
    for failure in &report.failures {
        assert!(matches!(failure.error, CrawlError::FetchFailed { .. }));
    }
    assert!(report
        .failures
        .iter()
        .any(|f| matches!(&f.error, CrawlError::FetchFailed { cause, .. } if cause == "HTTP 500")));
    assert!(report
        .failures
        .iter()
        .any(|f| matches!(&f.error, CrawlError::FetchFailed { cause, .. } if cause == "HTTP 404")));
}

#[tokio::test]
async fn test_content_type_handling() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/data">Data</a><a href="/guide.pdf">Guide</a><a href="/logo.PNG">Logo</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/data"))
        .respond_with(
            ResponseTemplate::new(200).set_body_raw(br#"{"key":"value"}"#.to_vec(), "application/json"),
        )
        .expect(1)
        .mount(&mock_server)
        .await;
    // Denied extensions are never requested
    Mock::given(method("GET"))
        .and(path("/guide.pdf"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&mock_server)
        .await;

    let report = crawl(&create_test_config(&base_url)).await;

    assert_eq!(report.pages.len(), 1);
    assert!(report.pages[0].internal_links.iter().all(|l| l.ends_with("/data")));
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(
        report.skipped[0].reason,
        SkipReason::NotHtml("application/json".to_string())
    );
    assert_eq!(report.excluded_links, 2);
}

#[tokio::test]
async fn test_off_origin_redirect_is_skipped() {
    let mock_server = MockServer::start().await;
    let other_server = MockServer::start().await;
    let base_url = mock_server.uri();
    let landing = format!("{}/landing", other_server.uri());

    mount_page(&mock_server, "/", r#"<a href="/leave">Leave</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/leave"))
        .respond_with(ResponseTemplate::new(302).insert_header("location", landing.as_str()))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&other_server, "/landing", r#"<a href="/deeper">Deeper</a>"#).await;

    let report = crawl(&create_test_config(&base_url)).await;

    assert_eq!(report.pages.len(), 1);
    assert_eq!(report.skipped.len(), 1);
    assert_eq!(report.skipped[0].url, format!("{}/leave", base_url));
    assert_eq!(report.skipped[0].reason, SkipReason::OffOriginRedirect(landing));
}

#[tokio::test]
async fn test_same_origin_redirect_target_not_refetched() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(
        &mock_server,
        "/",
        r#"<a href="/old">Old</a><a href="/new">New</a>"#,
    )
    .await;
    Mock::given(method("GET"))
        .and(path("/old"))
        .respond_with(ResponseTemplate::new(301).insert_header("location", "/new"))
        .expect(1)
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/new", "<title>New</title>").await;

    let report = crawl(&create_test_config(&base_url)).await;

    let old_url = format!("{}/old", base_url);
    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.pages[1].url, old_url);
    assert_eq!(report.pages[1].title, "New");
}

#[tokio::test]
async fn test_user_agent_header_sent() {
    let mock_server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/"))
        .and(header("user-agent", "TestBot/1.0.0"))
        .respond_with(html("<title>Hi</title>"))
        .expect(1)
        .mount(&mock_server)
        .await;

    let report = crawl(&create_test_config(&mock_server.uri())).await;
    assert_eq!(report.pages.len(), 1);
}

#[tokio::test]
async fn test_slow_page_times_out() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<a href="/slow">Slow</a><a href="/fast">Fast</a>"#).await;
    Mock::given(method("GET"))
        .and(path("/slow"))
        .respond_with(html("<title>Slow</title>").set_delay(Duration::from_secs(5)))
        .mount(&mock_server)
        .await;
    mount_page(&mock_server, "/fast", "<title>Fast</title>").await;

    let mut config = create_test_config(&base_url);
    config.fetch_timeout_secs = 1;
    let report = crawl(&config).await;

    assert_eq!(report.pages.len(), 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, format!("{}/slow", base_url));
}

#[tokio::test]
async fn test_worker_pool_crawl() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    let routes = ["/", "/one", "/two", "/three", "/four"];
    let links: String = routes
        .iter()
        .map(|r| format!(r#"<a href="{}">{}</a>"#, r, r))
        .collect();
    for route in routes {
        mount_page(&mock_server, route, &links).await;
    }

    let mut config = create_test_config(&base_url);
    config.max_concurrent_fetches = 3;
    config.delay_ms = 0;
    let report = crawl(&config).await;

    let mut urls = page_urls(&report);
    urls.sort();
    urls.dedup();
    assert_eq!(urls.len(), routes.len());
}

#[tokio::test]
async fn test_sitemap_written_and_listed() {
    let mock_server = MockServer::start().await;
    let base_url = mock_server.uri();

    mount_page(&mock_server, "/", r#"<title>Home</title><a href="/z">Z</a><a href="/a">A</a>"#).await;
    mount_page(&mock_server, "/z", "<title>Z</title>").await;
    mount_page(&mock_server, "/a", "<title>A</title>").await;

    let report = crawl(&create_test_config(&base_url)).await;

    let dir = tempfile::TempDir::new().unwrap();
    let layout = ProjectLayout::new(dir.path(), "Integration Test").unwrap();
    layout.create().unwrap();
    save_sitemap(&report.pages, &layout.sitemap_path()).unwrap();

    let records = load_sitemap(&layout.sitemap_path()).unwrap();
    assert_eq!(records, report.pages);
    assert_eq!(
        list_pages(&records),
        vec![
            format!("{}/", base_url),
            format!("{}/a", base_url),
            format!("{}/z", base_url),
        ]
    );
}
