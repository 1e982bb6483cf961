//! URL handling module
//!
//! This module provides canonicalization, origin extraction, extension
//! filtering and link classification.

mod canonical;
mod extension;
mod origin;

// Re-export main functions
pub use canonical::{canonicalize, canonicalize_seed};
pub use extension::{ExtensionFilter, DEFAULT_DENIED_EXTENSIONS};
pub use origin::Origin;

use crate::UrlError;
use std::fmt;
use url::{ParseError, Url};

/// Why a link was left out of both link sets
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExclusionReason {
    /// Non-http(s) scheme such as `mailto:`, `tel:` or `javascript:`
    Scheme(String),
    /// Pure in-page anchor (`#...`)
    Fragment,
    /// Same-origin link to a denied document/binary type
    Extension(String),
    /// The link could not be canonicalized
    Malformed(UrlError),
}

impl fmt::Display for ExclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Scheme(scheme) => write!(f, "{}: scheme", scheme),
            Self::Fragment => write!(f, "in-page anchor"),
            Self::Extension(ext) => write!(f, ".{} file", ext),
            Self::Malformed(e) => write!(f, "{}", e),
        }
    }
}

/// Classification of a candidate link
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkClass {
    /// Same-origin page; carries the canonical URL to enqueue
    Internal(Url),
    /// Cross-origin link; recorded, never crawled
    External(String),
    /// Neither recorded nor crawled
    Excluded(ExclusionReason),
}

/// Classifies a candidate link found on a page
///
/// # Classification Rules
///
/// 1. Fragment-only links (`#top`) are excluded
/// 2. Absolute links with a non-http(s) scheme are excluded
/// 3. Absolute http(s) links are internal when their origin equals the crawl
///    origin, otherwise external (kept in their raw form)
/// 4. Relative links are resolved against `base`; the resolved origin is
///    still checked so protocol-relative links (`//other.org/x`) and a
///    cross-origin `<base href>` come out external
/// 5. Internal links whose last path segment has a denied extension are
///    excluded
/// 6. Anything that fails canonicalization is excluded as malformed
///
/// Pure function: no state besides its arguments.
///
/// # Arguments
///
/// * `raw` - The href as found in the page
/// * `base` - The page's effective base (`<base href>` or the page URL)
/// * `origin` - The crawl origin
/// * `filter` - Denied extensions for internal links
///
/// # Examples
///
/// ```
/// use site_crawler::url::{classify_link, ExtensionFilter, LinkClass, Origin};
/// use url::Url;
///
/// let page = Url::parse("https://example.com/").unwrap();
/// let origin = Origin::of(&page).unwrap();
/// let filter = ExtensionFilter::default();
///
/// assert!(matches!(
///     classify_link("/a", &page, &origin, &filter),
///     LinkClass::Internal(_)
/// ));
/// assert_eq!(
///     classify_link("https://other.com/a", &page, &origin, &filter),
///     LinkClass::External("https://other.com/a".to_string())
/// );
/// ```
pub fn classify_link(raw: &str, base: &Url, origin: &Origin, filter: &ExtensionFilter) -> LinkClass {
    let raw = raw.trim();

    if raw.starts_with('#') {
        return LinkClass::Excluded(ExclusionReason::Fragment);
    }

    let is_absolute = match Url::parse(raw) {
        Ok(absolute) => {
            if absolute.scheme() != "http" && absolute.scheme() != "https" {
                return LinkClass::Excluded(ExclusionReason::Scheme(
                    absolute.scheme().to_string(),
                ));
            }
            true
        }
        Err(ParseError::RelativeUrlWithoutBase) => false,
        Err(e) => {
            return LinkClass::Excluded(ExclusionReason::Malformed(UrlError::Parse(format!(
                "{}: {}",
                raw, e
            ))))
        }
    };

    let canonical = match canonicalize(raw, base) {
        Ok(url) => url,
        Err(UrlError::InvalidScheme(scheme)) => {
            return LinkClass::Excluded(ExclusionReason::Scheme(scheme))
        }
        Err(e) => return LinkClass::Excluded(ExclusionReason::Malformed(e)),
    };

    if !origin.contains(&canonical) {
        // Absolute links keep their raw text; resolved relative ones have no
        // meaningful raw form outside the page.
        let external = if is_absolute {
            raw.to_string()
        } else {
            base.join(raw)
                .map(|u| u.to_string())
                .unwrap_or_else(|_| canonical.to_string())
        };
        return LinkClass::External(external);
    }

    if let Some(ext) = filter.denied_extension(&canonical) {
        return LinkClass::Excluded(ExclusionReason::Extension(ext));
    }

    LinkClass::Internal(canonical)
}
