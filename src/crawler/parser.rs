//! HTML parser for extracting page data
//!
//! This module handles parsing HTML content to extract:
//! - The page title
//! - The heading outline (`h1`–`h6`, document order)
//! - The `<base href>` override
//! - Raw anchor targets, for classification by the caller

use crate::state::Heading;
use crate::CrawlError;
use scraper::{ElementRef, Html, Selector};

/// Extracted information from an HTML page
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExtractedPage {
    /// Trimmed text of the first `<title>`; empty if absent
    pub title: String,

    /// Every heading in document order, including empty ones
    pub headings: Vec<Heading>,

    /// `<base href>` value; empty if absent
    pub base_href: String,

    /// Trimmed `href` of every anchor that has one, in document order,
    /// not de-duplicated
    pub anchor_hrefs: Vec<String>,
}

/// Parses HTML content and extracts title, headings, base href and anchors
///
/// Malformed markup is parsed leniently the way browsers do; links are not
/// resolved or filtered here.
///
/// # Arguments
///
/// * `html` - The HTML content to parse
/// * `page_url` - The page URL, used for error reporting
///
/// # Returns
///
/// * `Ok(ExtractedPage)` - Successfully parsed page
/// * `Err(CrawlError::ParseFailed)` - A selector could not be built
///
/// # Example
///
/// ```
/// use site_crawler::crawler::extract;
///
/// let html = r#"<html><head><title>Test</title></head><body><h1>Hi</h1><a href="/page">Link</a></body></html>"#;
/// let page = extract(html, "https://example.com/").unwrap();
/// assert_eq!(page.title, "Test");
/// assert_eq!(page.headings[0].level, 1);
/// assert_eq!(page.anchor_hrefs, vec!["/page".to_string()]);
/// ```
pub fn extract(html: &str, page_url: &str) -> Result<ExtractedPage, CrawlError> {
    let document = Html::parse_document(html);

    Ok(ExtractedPage {
        title: extract_title(&document, page_url)?,
        headings: extract_headings(&document, page_url)?,
        base_href: extract_base_href(&document, page_url)?,
        anchor_hrefs: extract_anchor_hrefs(&document, page_url)?,
    })
}

fn selector(css: &str, page_url: &str) -> Result<Selector, CrawlError> {
    Selector::parse(css).map_err(|e| CrawlError::ParseFailed {
        url: page_url.to_string(),
        message: format!("invalid selector '{}': {:?}", css, e),
    })
}

fn element_text(element: &ElementRef<'_>) -> String {
    element.text().collect::<String>().trim().to_string()
}

/// Extracts the page title from the HTML document
fn extract_title(document: &Html, page_url: &str) -> Result<String, CrawlError> {
    let title_selector = selector("title", page_url)?;

    Ok(document
        .select(&title_selector)
        .next()
        .map(|element| element_text(&element))
        .unwrap_or_default())
}

/// Extracts every heading with its level
fn extract_headings(document: &Html, page_url: &str) -> Result<Vec<Heading>, CrawlError> {
    let heading_selector = selector("h1, h2, h3, h4, h5, h6", page_url)?;

    Ok(document
        .select(&heading_selector)
        .filter_map(|element| Heading::from_tag(element.value().name(), element_text(&element)))
        .collect())
}

/// Extracts the `<base href>` override
fn extract_base_href(document: &Html, page_url: &str) -> Result<String, CrawlError> {
    let base_selector = selector("base[href]", page_url)?;

    Ok(document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .unwrap_or_default())
}

/// Extracts the href of every anchor that has one
fn extract_anchor_hrefs(document: &Html, page_url: &str) -> Result<Vec<String>, CrawlError> {
    let a_selector = selector("a[href]", page_url)?;

    Ok(document
        .select(&a_selector)
        .filter_map(|element| element.value().attr("href"))
        .map(|href| href.trim().to_string())
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    const URL: &str = "https://example.com/page";

    #[test]
    fn test_extract_title() {
        let html = r#"<html><head><title>Test Page</title></head><body></body></html>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_extract_title_with_whitespace() {
        let html = "<html><head><title>\n  Test Page  </title></head><body></body></html>";
        let page = extract(html, URL).unwrap();
        assert_eq!(page.title, "Test Page");
    }

    #[test]
    fn test_no_title_is_empty() {
        let html = r#"<html><head></head><body></body></html>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.title, "");
    }

    #[test]
    fn test_first_title_wins() {
        let html = r#"<html><head><title>One</title><title>Two</title></head></html>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.title, "One");
    }

    #[test]
    fn test_headings_in_document_order() {
        let html = r#"
            <html><body>
                <h2>Second level</h2>
                <h1> Top </h1>
                <div><h6>Deep</h6></div>
                <h3></h3>
            </body></html>
        "#;
        let page = extract(html, URL).unwrap();
        let outline: Vec<(u8, &str)> = page
            .headings
            .iter()
            .map(|h| (h.level, h.text.as_str()))
            .collect();
        assert_eq!(
            outline,
            vec![(2, "Second level"), (1, "Top"), (6, "Deep"), (3, "")]
        );
    }

    #[test]
    fn test_heading_text_includes_nested_elements() {
        let html = r#"<h1>Hello <em>world</em></h1>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.headings[0].text, "Hello world");
    }

    #[test]
    fn test_base_href() {
        let html = r#"<html><head><base href=" /base/ "></head><body></body></html>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.base_href, "/base/");
    }

    #[test]
    fn test_base_without_href_ignored() {
        let html = r#"<html><head><base target="_blank"></head><body></body></html>"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.base_href, "");
    }

    #[test]
    fn test_anchor_hrefs_in_order_with_duplicates() {
        let html = r##"
            <html><body>
                <a href=" /a ">A</a>
                <a name="no-href">skip</a>
                <a href="https://other.com/">B</a>
                <a href="#top">Top</a>
                <a href="/a">A again</a>
                <a href="">Empty</a>
            </body></html>
        "##;
        let page = extract(html, URL).unwrap();
        assert_eq!(
            page.anchor_hrefs,
            vec!["/a", "https://other.com/", "#top", "/a", ""]
        );
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let html = r#"<title>Broken</title><ul><li><a href="/x">X</a><li><a href="/y">Y</a></ul><h1>T"#;
        let page = extract(html, URL).unwrap();
        assert_eq!(page.title, "Broken");
        assert_eq!(page.anchor_hrefs, vec!["/x", "/y"]);
        assert_eq!(page.headings, vec![Heading::from_tag("h1", "T").unwrap()]);
    }

    #[test]
    fn test_empty_document() {
        let page = extract("", URL).unwrap();
        assert_eq!(page, ExtractedPage::default());
    }
}
