use crate::UrlError;
use url::{ParseError, Url};

/// Canonicalizes a link against a base URL
///
/// # Canonicalization Steps
///
/// 1. Trim surrounding whitespace; reject empty and fragment-only input
/// 2. If the input is absolute, parse it as-is
/// 3. Otherwise resolve it against `base` (dot segments removed,
///    root-relative paths resolved against the base's origin)
/// 4. Reject anything that is not http(s) or has no host
/// 5. Strip the fragment and the query string
///
/// No case, trailing-slash or default-port normalization is applied beyond
/// what URL parsing itself performs, so two canonical forms are equal iff
/// their strings are equal.
///
/// # Arguments
///
/// * `raw` - The link text as found in the page
/// * `base` - The effective base (the page's `<base href>` or the page URL)
///
/// # Returns
///
/// * `Ok(Url)` - Canonical URL
/// * `Err(UrlError)` - The link could not be canonicalized
///
/// # Examples
///
/// ```
/// use site_crawler::url::canonicalize;
/// use url::Url;
///
/// let base = Url::parse("https://example.com/dir/page.html").unwrap();
/// let url = canonicalize("../x?y=1#top", &base).unwrap();
/// assert_eq!(url.as_str(), "https://example.com/x");
/// ```
pub fn canonicalize(raw: &str, base: &Url) -> Result<Url, UrlError> {
    let raw = raw.trim();

    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    if raw.starts_with('#') {
        return Err(UrlError::FragmentOnly(raw.to_string()));
    }

    let mut url = match Url::parse(raw) {
        Ok(url) => url,
        Err(ParseError::RelativeUrlWithoutBase) => base
            .join(raw)
            .map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?,
        Err(e) => return Err(UrlError::Parse(format!("{}: {}", raw, e))),
    };

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }

    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    strip_query_and_fragment(&mut url);
    Ok(url)
}

/// Parses a seed URL, assuming `https://` when no http(s) scheme is given
///
/// ```
/// use site_crawler::url::canonicalize_seed;
///
/// let seed = canonicalize_seed("example.com/start?ref=1").unwrap();
/// assert_eq!(seed.as_str(), "https://example.com/start");
/// ```
pub fn canonicalize_seed(raw: &str) -> Result<Url, UrlError> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Err(UrlError::Empty);
    }

    let absolute = match raw.split_once("://") {
        Some((scheme, _))
            if scheme.eq_ignore_ascii_case("http") || scheme.eq_ignore_ascii_case("https") =>
        {
            raw.to_string()
        }
        Some((scheme, _)) if is_scheme(scheme) => {
            return Err(UrlError::InvalidScheme(scheme.to_string()))
        }
        _ => format!("https://{}", raw),
    };

    let mut url = Url::parse(&absolute).map_err(|e| UrlError::Parse(format!("{}: {}", raw, e)))?;
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost(raw.to_string()));
    }

    strip_query_and_fragment(&mut url);
    Ok(url)
}

/// Returns true if `s` is syntactically a URL scheme (`ftp`, `svn+ssh`, ...)
fn is_scheme(s: &str) -> bool {
    let mut chars = s.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Removes the query string and fragment in place
fn strip_query_and_fragment(url: &mut Url) {
    url.set_fragment(None);
    url.set_query(None);
}
