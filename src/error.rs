// src/error.rs
// =============================================================================
// Error types for the parts of an analysis that can fail.
//
// Only three things are fatal: a bad URL from the user, a page that could not
// be fetched, and a body that is not markup. Problems with individual links
// are never errors; they only show up in the inaccessible count.
// =============================================================================

use thiserror::Error;

/// Why a user-supplied URL was rejected.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum UrlError {
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    #[error("unsupported scheme {0:?}")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,
}

/// Why the top-level page could not be downloaded.
#[derive(Debug, Error)]
pub enum FetchError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The server answered, but not with 2xx/3xx.
    #[error("non-OK status: {status} (final URL {final_url})")]
    Status { status: u16, final_url: String },

    #[error("time budget exhausted while fetching the page")]
    Budget,
}

#[derive(Debug, Error)]
pub enum AnalyzeError {
    #[error("parse error: {0}")]
    Parse(String),

    #[error("invalid selector {selector:?}: {message}")]
    Selector {
        selector: &'static str,
        message: String,
    },

    #[error("invalid doctype pattern: {0}")]
    Pattern(#[from] regex::Error),
}
