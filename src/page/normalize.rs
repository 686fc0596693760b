// src/page/normalize.rs
// =============================================================================
// Turns whatever the user typed into an absolute http/https URL, and decides
// when two URLs point at "the same site".
//
// We use the `url` crate for the actual parsing. On top of it we add:
// - a default scheme (people type "example.com", not "https://example.com")
// - a scheme whitelist (only http and https can be fetched)
// - the www.-insensitive host comparison used for internal/external links
//
// Rust concepts:
// - Newtypes: NormalizedUrl wraps url::Url so the checks can't be skipped
// - Result<T, E>: every rejection carries a typed UrlError
// =============================================================================

use crate::error::UrlError;
use std::fmt;
use url::Url;

/// An absolute URL whose scheme is http or https and whose host is not empty.
///
/// The only ways to build one are [`NormalizedUrl::parse`] and
/// [`NormalizedUrl::from_url`], so every value upholds that invariant.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct NormalizedUrl(Url);

impl NormalizedUrl {
    /// Normalizes a raw, user-supplied string.
    ///
    /// Examples:
    ///   "example.com"        -> https://example.com/
    ///   "http://test.com"    -> http://test.com/
    ///   "ftp://example.com"  -> Err(UnsupportedScheme)
    ///   "http://"            -> Err(MissingHost)
    pub fn parse(raw: &str) -> Result<Self, UrlError> {
        let raw = raw.trim();
        let candidate = if raw.contains("://") {
            raw.to_string()
        } else {
            format!("https://{}", raw)
        };

        let url = match Url::parse(&candidate) {
            Ok(url) => url,
            // "http://" parses far enough for the parser to complain about the
            // host, which is a missing host rather than garbage input
            Err(url::ParseError::EmptyHost) => return Err(UrlError::MissingHost),
            Err(e) => return Err(UrlError::InvalidUrl(e.to_string())),
        };

        Self::from_url(url)
    }

    /// Checks an already-parsed URL (for example one resolved from an href).
    pub fn from_url(url: Url) -> Result<Self, UrlError> {
        if !matches!(url.scheme(), "http" | "https") {
            return Err(UrlError::UnsupportedScheme(url.scheme().to_string()));
        }
        if url.host_str().map_or(true, str::is_empty) {
            return Err(UrlError::MissingHost);
        }
        Ok(Self(url))
    }

    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Lower-cased host name (never empty).
    pub fn host(&self) -> String {
        self.0.host_str().unwrap_or_default().to_ascii_lowercase()
    }

    /// Resolves an href relative to this URL.
    ///
    /// Returns None when the result doesn't parse or isn't http/https.
    pub fn join(&self, href: &str) -> Option<NormalizedUrl> {
        let joined = self.0.join(href).ok()?;
        Self::from_url(joined).ok()
    }

    /// Host equivalence: same lower-cased host after dropping one leading
    /// "www." from each side. Port, trailing dots and IDN forms are NOT
    /// canonicalized.
    pub fn same_host(&self, other: &NormalizedUrl) -> bool {
        same_host(&self.host(), &other.host())
    }
}

/// Compares two host names the way [`NormalizedUrl::same_host`] does.
pub fn same_host(a: &str, b: &str) -> bool {
    fn trim_www(host: &str) -> String {
        let host = host.to_ascii_lowercase();
        match host.strip_prefix("www.") {
            Some(rest) => rest.to_string(),
            None => host,
        }
    }
    trim_www(a) == trim_www(b)
}

impl fmt::Display for NormalizedUrl {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.0.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_adds_https_when_scheme_missing() {
        let url = NormalizedUrl::parse("example.com").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_keeps_explicit_scheme_and_path() {
        assert_eq!(
            NormalizedUrl::parse("http://test.com").unwrap().as_str(),
            "http://test.com/"
        );
        assert_eq!(
            NormalizedUrl::parse("  https://secure.org/path ").unwrap().as_str(),
            "https://secure.org/path"
        );
    }

    #[test]
    fn test_rejects_unsupported_scheme() {
        assert_eq!(
            NormalizedUrl::parse("ftp://x"),
            Err(UrlError::UnsupportedScheme("ftp".to_string()))
        );
    }

    #[test]
    fn test_rejects_missing_host() {
        assert_eq!(NormalizedUrl::parse("http://"), Err(UrlError::MissingHost));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(matches!(
            NormalizedUrl::parse("://bad"),
            Err(UrlError::InvalidUrl(_))
        ));
    }

    #[test]
    fn test_same_host_ignores_www_prefix() {
        let a = NormalizedUrl::parse("https://example.com").unwrap();
        let b = NormalizedUrl::parse("https://www.example.com/x").unwrap();
        assert!(a.same_host(&b));
        assert!(b.same_host(&a));
    }

    #[test]
    fn test_same_host_is_case_insensitive_and_strips_once() {
        assert!(same_host("WWW.Example.com", "example.COM"));
        assert!(!same_host("www.www.example.com", "example.com"));
        assert!(!same_host("example.com", "other.com"));
    }

    #[test]
    fn test_join_filters_non_http() {
        let base = NormalizedUrl::parse("https://example.com/page/").unwrap();
        assert_eq!(
            base.join("../docs").unwrap().as_str(),
            "https://example.com/docs"
        );
        assert!(base.join("ftp://example.com/file").is_none());
        assert!(base.join("tel:12345").is_none());
    }
}
