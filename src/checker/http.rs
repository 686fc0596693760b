// src/checker/http.rs
// =============================================================================
// Checks whether the links on a page are reachable.
//
// Key functionality:
// - Deduplicates links and caps how many get checked
// - Probes each link with HEAD (lightweight, no body download)
// - Falls back to GET when the server refuses HEAD with 405 or 403
// - Runs probes on a fixed-size worker pool under the shared budget
//
// The result is only two numbers: how many links were checked, and how many
// of those were broken. Individual failures are logged, never returned.
//
// Rust concepts:
// - async/await: For concurrent network I/O
// - Enums: To represent the outcome of one probe
// - Closures: The pool gets a closure that turns a URL into a probe future
// =============================================================================

use super::pool::bounded_fold;
use crate::budget::Budget;
use crate::config::AnalyzerConfig;
use crate::inspect::Link;
use reqwest::{Client, Response, StatusCode};
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Outcome of probing a single link.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ProbeOutcome {
    /// Final status was 2xx or 3xx
    Reachable { status: u16 },
    /// The server answered with an error status
    BadStatus { status: u16 },
    /// The request failed before a response arrived (DNS, TLS, refused, ...)
    Failed { reason: String },
    /// The per-link timeout ran out
    TimedOut,
}

impl ProbeOutcome {
    pub fn is_broken(&self) -> bool {
        !matches!(self, ProbeOutcome::Reachable { .. })
    }
}

/// Counts produced by [`check_links`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LinkTally {
    /// Links that answered with an error or not at all
    pub inaccessible: usize,
    /// Links that produced a result before the budget ran out
    pub checked: usize,
}

impl LinkTally {
    fn record(mut self, broken: bool) -> Self {
        self.checked += 1;
        if broken {
            self.inaccessible += 1;
        }
        self
    }
}

/// Unique targets in first-seen order, cut off at `cap`.
fn unique_targets(links: &[Link], cap: usize) -> Vec<String> {
    let mut seen = HashSet::new();
    links
        .iter()
        .map(|link| link.target.as_str())
        .filter(|url| seen.insert(*url))
        .take(cap)
        .map(str::to_string)
        .collect()
}

/// Checks the links concurrently and counts the broken ones.
///
/// Stops early, without an error, when the budget runs out; `checked` then
/// tells how far it got.
pub async fn check_links(
    client: &Client,
    links: &[Link],
    config: &AnalyzerConfig,
    budget: Budget,
) -> LinkTally {
    // Same URL twice is only checked once; anything past the cap is skipped
    let targets = unique_targets(links, config.checked_links_cap);
    if targets.is_empty() {
        return LinkTally::default();
    }

    let candidates = targets.len();
    info!(
        candidates,
        found = links.len(),
        workers = config.pool_size.min(candidates),
        "checking links"
    );

    // The closure below is moved into worker tasks, so it needs owned values.
    // Cloning a Client is cheap: the clones share one connection pool.
    let client = client.clone();
    let per_link_timeout = config.per_link_timeout;
    let body_cap = config.probe_body_bytes;

    let folded = bounded_fold(
        targets,
        config.pool_size,
        budget,
        move |url: String| {
            let client = client.clone();
            async move {
                let outcome = probe(&client, &url, per_link_timeout, body_cap).await;
                if outcome.is_broken() {
                    debug!(url = %url, ?outcome, "link is inaccessible");
                }
                outcome.is_broken()
            }
        },
        LinkTally::default(),
        LinkTally::record,
    )
    .await;

    if folded.exhausted {
        warn!(
            checked = folded.value.checked,
            candidates, "time budget exhausted, returning partial link results"
        );
    }

    folded.value
}

/// Probes one URL: HEAD first, GET only when HEAD is answered with 405/403.
///
/// The whole probe, including the GET retry, has to fit in `timeout`.
pub async fn probe(client: &Client, url: &str, timeout: Duration, body_cap: usize) -> ProbeOutcome {
    let attempt = async {
        let head = match client.head(url).send().await {
            Ok(response) => response,
            // no GET retry when HEAD couldn't even get an answer
            Err(e) => return categorize_error(e),
        };

        // 2xx and 3xx mean the link works
        let status = head.status();
        if is_reachable(status) {
            return ProbeOutcome::Reachable {
                status: status.as_u16(),
            };
        }
        if !matches!(status, StatusCode::METHOD_NOT_ALLOWED | StatusCode::FORBIDDEN) {
            return ProbeOutcome::BadStatus {
                status: status.as_u16(),
            };
        }

        // Some servers refuse HEAD but serve GET fine
        debug!(url, status = status.as_u16(), "HEAD refused, retrying with GET");
        let mut get = match client.get(url).send().await {
            Ok(response) => response,
            Err(e) => return categorize_error(e),
        };
        let status = get.status();
        discard_body(&mut get, body_cap).await;

        if is_reachable(status) {
            ProbeOutcome::Reachable {
                status: status.as_u16(),
            }
        } else {
            ProbeOutcome::BadStatus {
                status: status.as_u16(),
            }
        }
    };

    match tokio::time::timeout(timeout, attempt).await {
        Ok(outcome) => outcome,
        Err(_) => ProbeOutcome::TimedOut,
    }
}

fn is_reachable(status: StatusCode) -> bool {
    status.is_success() || status.is_redirection()
}

/// Reads and drops at most `cap` bytes of the body.
async fn discard_body(response: &mut Response, cap: usize) {
    let mut read = 0;
    while read < cap {
        match response.chunk().await {
            Ok(Some(chunk)) => read += chunk.len(),
            _ => break,
        }
    }
}

fn categorize_error(error: reqwest::Error) -> ProbeOutcome {
    if error.is_timeout() {
        ProbeOutcome::TimedOut
    } else {
        ProbeOutcome::Failed {
            reason: error.to_string(),
        }
    }
}
