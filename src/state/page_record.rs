use serde::{Deserialize, Serialize};

/// One heading of a page outline
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Heading {
    /// 1..=6, from the tag name
    pub level: u8,
    pub text: String,
}

impl Heading {
    /// Builds a heading from an element name such as `h2`
    ///
    /// Returns None for anything other than `h1`..`h6`.
    pub fn from_tag(tag: &str, text: impl Into<String>) -> Option<Self> {
        let level = tag
            .strip_prefix('h')
            .or_else(|| tag.strip_prefix('H'))?
            .parse::<u8>()
            .ok()
            .filter(|l| (1..=6).contains(l))?;

        Some(Self {
            level,
            text: text.into(),
        })
    }
}

/// The structured extraction result for one successfully crawled page
///
/// Serialized with the field names the sitemap consumers expect:
/// `title, url, headings, internalLinks, externalLinks, image?`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageRecord {
    pub title: String,

    /// Canonical URL that was fetched; unique within one run
    pub url: String,

    /// In document order
    pub headings: Vec<Heading>,

    /// Canonical same-origin URLs, first-seen order, no duplicates
    pub internal_links: Vec<String>,

    /// Raw cross-origin URLs, first-seen order, no duplicates
    pub external_links: Vec<String>,

    /// Screenshot filename, set only by the screenshot pass
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

impl PageRecord {
    pub fn new(url: impl Into<String>, title: impl Into<String>, headings: Vec<Heading>) -> Self {
        Self {
            title: title.into(),
            url: url.into(),
            headings,
            internal_links: Vec::new(),
            external_links: Vec::new(),
            image: None,
        }
    }

    /// Adds an internal link unless it is already present
    pub fn add_internal_link(&mut self, url: impl Into<String>) -> bool {
        push_unique(&mut self.internal_links, url.into())
    }

    /// Adds an external link unless it is already present
    pub fn add_external_link(&mut self, url: impl Into<String>) -> bool {
        push_unique(&mut self.external_links, url.into())
    }
}

fn push_unique(links: &mut Vec<String>, link: String) -> bool {
    if links.contains(&link) {
        return false;
    }
    links.push(link);
    true
}
