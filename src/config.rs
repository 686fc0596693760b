// src/config.rs
// =============================================================================
// Tunables for one analysis, and the HTTP client built from them.
//
// The values come from command-line flags (or their PAGE_INSPECTOR_*
// environment variables, see cli.rs). Defaults match what a single page
// analysis needs: at most 150 links checked by 12 workers, 8 seconds per
// link, 45 seconds for everything.
// =============================================================================

use serde::{Serialize, Serializer};
use std::time::Duration;

pub const DEFAULT_CHECKED_LINKS_CAP: usize = 150;
pub const DEFAULT_POOL_SIZE: usize = 12;
pub const DEFAULT_PER_LINK_TIMEOUT_SECS: u64 = 8;
pub const DEFAULT_BUDGET_SECS: u64 = 45;
pub const DEFAULT_MAX_BODY_BYTES: usize = 4 << 20;
pub const DEFAULT_PROBE_BODY_BYTES: usize = 64 << 10;

const MAX_REDIRECTS: usize = 10;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct AnalyzerConfig {
    /// Most links checked per page, after deduplication
    pub checked_links_cap: usize,
    /// Number of concurrent link probes
    pub pool_size: usize,
    /// Limit for one link probe, HEAD and GET retry together
    #[serde(serialize_with = "as_secs")]
    pub per_link_timeout: Duration,
    /// Limit for the whole analysis, page fetch included
    #[serde(serialize_with = "as_secs")]
    pub budget: Duration,
    /// The fetched page is cut off after this many bytes
    pub max_body_bytes: usize,
    /// A GET fallback probe reads at most this much of the body
    pub probe_body_bytes: usize,
}

impl Default for AnalyzerConfig {
    fn default() -> Self {
        Self {
            checked_links_cap: DEFAULT_CHECKED_LINKS_CAP,
            pool_size: DEFAULT_POOL_SIZE,
            per_link_timeout: Duration::from_secs(DEFAULT_PER_LINK_TIMEOUT_SECS),
            budget: Duration::from_secs(DEFAULT_BUDGET_SECS),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
            probe_body_bytes: DEFAULT_PROBE_BODY_BYTES,
        }
    }
}

impl AnalyzerConfig {
    /// Builds the HTTP client shared by the page fetch and every link probe.
    ///
    /// The client keeps a connection pool, so clones of it reuse connections.
    pub fn http_client(&self) -> reqwest::Result<reqwest::Client> {
        reqwest::Client::builder()
            .user_agent(concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION")))
            .timeout(self.per_link_timeout)
            .connect_timeout(Duration::from_secs(4))
            .pool_idle_timeout(Duration::from_secs(30))
            .redirect(reqwest::redirect::Policy::limited(MAX_REDIRECTS))
            .build()
    }
}

fn as_secs<S: Serializer>(duration: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_f64(duration.as_secs_f64())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AnalyzerConfig::default();
        assert_eq!(config.checked_links_cap, 150);
        assert_eq!(config.pool_size, 12);
        assert_eq!(config.per_link_timeout, Duration::from_secs(8));
        assert_eq!(config.budget, Duration::from_secs(45));
        assert_eq!(config.max_body_bytes, 4 * 1024 * 1024);
    }

    #[test]
    fn test_durations_serialize_as_seconds() {
        let json = serde_json::to_value(AnalyzerConfig::default()).unwrap();
        assert_eq!(json["per_link_timeout"], 8.0);
        assert_eq!(json["budget"], 45.0);
    }

    #[test]
    fn test_builds_client() {
        assert!(AnalyzerConfig::default().http_client().is_ok());
    }
}
