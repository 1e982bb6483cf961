//! Static HTML outline of a crawled site
//!
//! One block per page: its title, its headings indented by level, and its
//! external links. All page-derived text is escaped.

use crate::output::OutputResult;
use crate::state::PageRecord;
use html_escape::{encode_double_quoted_attribute, encode_text};
use std::fmt::Write as _;
use std::path::Path;

/// Indentation per heading level, in pixels
const INDENT_PX: u32 = 15;

/// Renders the outline document
///
/// # Arguments
///
/// * `records` - Page records in sitemap order
/// * `project_name` - Shown in the document heading
pub fn render_outline(records: &[PageRecord], project_name: &str) -> String {
    let project = encode_text(project_name);
    let mut html = String::new();

    html.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n<meta charset=\"UTF-8\">\n");
    let _ = writeln!(html, "<title>Crawled {}</title>", project);
    html.push_str(
        "<style>body { margin: 0; padding: 2em; font-family: Arial, Helvetica, sans-serif; font-size: 16px; }</style>\n",
    );
    html.push_str("</head>\n<body>\n");
    let _ = writeln!(html, "<h1>Crawled {}</h1>", project);

    for record in records {
        render_page(&mut html, record);
    }

    html.push_str("</body>\n</html>\n");
    html
}

fn render_page(html: &mut String, record: &PageRecord) {
    let title = if record.title.is_empty() {
        &record.url
    } else {
        &record.title
    };

    html.push_str("<div class=\"page\">\n");
    let _ = writeln!(
        html,
        "<h2><a href=\"{}\">{}</a></h2>",
        encode_double_quoted_attribute(&record.url),
        encode_text(title)
    );

    html.push_str("<div class=\"headings\">\n<h3>Headings:</h3>\n<ul>\n");
    for heading in &record.headings {
        let _ = writeln!(
            html,
            "<li style=\"padding-left: {}px;\">{}</li>",
            u32::from(heading.level) * INDENT_PX,
            encode_text(&heading.text)
        );
    }
    html.push_str("</ul>\n</div>\n");

    if !record.external_links.is_empty() {
        html.push_str("<div class=\"links\">\n<h3>External Links:</h3>\n<ul>\n");
        for link in &record.external_links {
            let _ = writeln!(
                html,
                "<li><a href=\"{}\" target=\"_blank\">{}</a></li>",
                encode_double_quoted_attribute(link),
                encode_text(link)
            );
        }
        html.push_str("</ul>\n</div>\n");
    }

    html.push_str("</div>\n");
}

/// Renders the outline and writes it to `path`
pub fn write_outline(records: &[PageRecord], project_name: &str, path: &Path) -> OutputResult<()> {
    std::fs::write(path, render_outline(records, project_name))?;
    tracing::info!("Wrote outline of {} pages to {}", records.len(), path.display());
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Heading;
    use tempfile::TempDir;

    fn record() -> PageRecord {
        let mut record = PageRecord::new(
            "https://site.test/",
            "Home & <Garden>",
            vec![
                Heading::from_tag("h1", "Welcome").unwrap(),
                Heading::from_tag("h3", "<script>alert(1)</script>").unwrap(),
            ],
        );
        record.add_external_link("https://ext.test/?a=1&b=\"2\"");
        record
    }

    #[test]
    fn test_headings_indented_by_level() {
        let html = render_outline(&[record()], "Admissions");
        assert!(html.contains("<li style=\"padding-left: 15px;\">Welcome</li>"));
        assert!(html.contains("padding-left: 45px;"));
        assert!(html.contains("<h1>Crawled Admissions</h1>"));
    }

    #[test]
    fn test_text_is_escaped() {
        let html = render_outline(&[record()], "Admissions");
        assert!(html.contains("Home &amp; &lt;Garden&gt;"));
        assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
        assert!(!html.contains("<script>"));
        assert!(html.contains("href=\"https://ext.test/?a=1&amp;b=&quot;2&quot;\""));
    }

    #[test]
    fn test_external_links_section_only_when_present() {
        let plain = PageRecord::new("https://site.test/about", "", Vec::new());
        let html = render_outline(&[plain], "Admissions");

        assert!(!html.contains("External Links"));
        // Untitled pages fall back to their URL
        assert!(html.contains(">https://site.test/about</a></h2>"));
    }

    #[test]
    fn test_write_outline() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("outline.html");
        write_outline(&[record()], "Admissions", &path).unwrap();

        let written = std::fs::read_to_string(&path).unwrap();
        assert!(written.starts_with("<!DOCTYPE html>"));
        assert_eq!(written.matches("<div class=\"page\">").count(), 1);
    }
}
