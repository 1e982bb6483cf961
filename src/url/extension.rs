use std::collections::HashSet;
use url::Url;

/// Extensions that are never crawled unless the configuration overrides them
pub const DEFAULT_DENIED_EXTENSIONS: &[&str] = &[
    // documents
    "pdf", "doc", "docx", "xls", "xlsx", "ppt", "pptx", "odt", "ods", "rtf", "csv",
    // images
    "png", "jpg", "jpeg", "gif", "svg", "webp", "bmp", "ico", "tif", "tiff",
    // media
    "mp3", "mp4", "m4a", "mov", "avi", "wav", "webm", "ogg",
    // archives and binaries
    "zip", "gz", "tgz", "tar", "rar", "7z", "exe", "dmg", "iso", "msi",
];

/// Denylist of file extensions for same-origin links
#[derive(Debug, Clone)]
pub struct ExtensionFilter {
    denied: HashSet<String>,
}

impl ExtensionFilter {
    /// Builds a filter from a list of extensions (case-insensitive, no dots)
    pub fn new<I, S>(extensions: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            denied: extensions
                .into_iter()
                .map(|e| e.as_ref().trim().trim_start_matches('.').to_lowercase())
                .filter(|e| !e.is_empty())
                .collect(),
        }
    }

    /// Returns the denied extension of the URL's last path segment, if any
    ///
    /// # Examples
    ///
    /// ```
    /// use site_crawler::url::ExtensionFilter;
    /// use url::Url;
    ///
    /// let filter = ExtensionFilter::default();
    /// let pdf = Url::parse("https://example.com/files/Guide.PDF").unwrap();
    /// assert_eq!(filter.denied_extension(&pdf), Some("pdf".to_string()));
    ///
    /// let page = Url::parse("https://example.com/about/").unwrap();
    /// assert_eq!(filter.denied_extension(&page), None);
    /// ```
    pub fn denied_extension(&self, url: &Url) -> Option<String> {
        let segment = url.path_segments()?.next_back()?;
        let (stem, ext) = segment.rsplit_once('.')?;
        if stem.is_empty() {
            return None;
        }

        let ext = ext.to_lowercase();
        self.denied.contains(&ext).then_some(ext)
    }

    pub fn len(&self) -> usize {
        self.denied.len()
    }

    pub fn is_empty(&self) -> bool {
        self.denied.is_empty()
    }
}

impl Default for ExtensionFilter {
    fn default() -> Self {
        Self::new(DEFAULT_DENIED_EXTENSIONS)
    }
}
