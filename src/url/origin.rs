use std::fmt;
use url::Url;

/// Scheme + host + port tuple bounding a crawl
///
/// Established once from the seed URL and never changed for the rest of the
/// run. The port is the effective port, so `https://example.com` and
/// `https://example.com:443` share an origin.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Origin {
    scheme: String,
    host: String,
    port: Option<u16>,
}

impl Origin {
    /// Extracts the origin of a URL
    ///
    /// Returns None for URLs without a host (e.g. `mailto:`).
    ///
    /// # Examples
    ///
    /// ```
    /// use url::Url;
    /// use site_crawler::url::Origin;
    ///
    /// let a = Origin::of(&Url::parse("https://Example.com/a").unwrap()).unwrap();
    /// let b = Origin::of(&Url::parse("https://example.com:443/b").unwrap()).unwrap();
    /// assert_eq!(a, b);
    /// ```
    pub fn of(url: &Url) -> Option<Self> {
        let host = url.host_str()?.to_lowercase();
        Some(Self {
            scheme: url.scheme().to_lowercase(),
            host,
            port: url.port_or_known_default(),
        })
    }

    /// Returns true if `url` belongs to this origin
    pub fn contains(&self, url: &Url) -> bool {
        Self::of(url).is_some_and(|other| other == *self)
    }

    pub fn host(&self) -> &str {
        &self.host
    }
}

fn default_port(scheme: &str) -> Option<u16> {
    match scheme {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Serializes like a URL origin: the port appears only when it is not the
/// scheme's default
impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.port {
            Some(port) if Some(port) != default_port(&self.scheme) => {
                write!(f, "{}://{}:{}", self.scheme, self.host, port)
            }
            _ => write!(f, "{}://{}", self.scheme, self.host),
        }
    }
}
