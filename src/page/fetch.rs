// src/page/fetch.rs
// =============================================================================
// Downloads the page that is going to be analyzed.
//
// The page is fetched exactly once. reqwest follows redirects for us, so the
// response already knows the final URL; we hand that and the status code back
// next to the body so they can be displayed.
//
// Limits:
// - the body is read in chunks and cut off at `max_body_bytes`
// - the whole fetch has to finish before the shared budget runs out
// =============================================================================

use crate::budget::Budget;
use crate::error::FetchError;
use crate::page::NormalizedUrl;
use reqwest::Client;
use tracing::{debug, info};

/// The raw result of fetching the top-level page.
#[derive(Debug, Clone)]
pub struct FetchedPage {
    /// URL after following redirects
    pub final_url: String,
    /// HTTP status of the final response
    pub status: u16,
    /// Body bytes, at most `max_body_bytes` of them
    pub body: Vec<u8>,
}

/// Fetches `url` with GET under the shared budget.
///
/// Statuses outside 200..400 are reported as [`FetchError::Status`].
pub async fn fetch_page(
    client: &Client,
    url: &NormalizedUrl,
    budget: Budget,
    max_body_bytes: usize,
) -> Result<FetchedPage, FetchError> {
    if budget.is_exhausted() {
        return Err(FetchError::Budget);
    }
    info!(url = %url, budget_secs = budget.remaining().as_secs_f64(), "fetching page");

    let fetch = async {
        let mut response = client.get(url.as_str()).send().await?;
        let status = response.status().as_u16();
        let final_url = response.url().to_string();

        if !(200..400).contains(&status) {
            return Err(FetchError::Status { status, final_url });
        }

        let mut body = Vec::new();
        while let Some(chunk) = response.chunk().await? {
            let room = max_body_bytes - body.len();
            if chunk.len() >= room {
                body.extend_from_slice(&chunk[..room]);
                debug!(limit = max_body_bytes, "page body truncated");
                break;
            }
            body.extend_from_slice(&chunk);
        }

        Ok(FetchedPage {
            final_url,
            status,
            body,
        })
    };

    match tokio::time::timeout_at(budget.deadline(), fetch).await {
        Ok(result) => {
            if let Ok(page) = &result {
                info!(status = page.status, bytes = page.body.len(), final_url = %page.final_url, "page fetched");
            }
            result
        }
        Err(_) => Err(FetchError::Budget),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use std::time::Duration;

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_follows_redirect_and_reports_final_url() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/old");
                then.status(302).header("Location", "/new");
            })
            .await;
        server
            .mock_async(|when, then| {
                when.method(GET).path("/new");
                then.status(200).body("<!doctype html><title>OK</title>");
            })
            .await;

        let url = NormalizedUrl::parse(&server.url("/old")).unwrap();
        let page = fetch_page(&client(), &url, Budget::new(Duration::from_secs(5)), 1024)
            .await
            .unwrap();

        assert_eq!(page.status, 200);
        assert_eq!(page.final_url, server.url("/new"));
        assert!(String::from_utf8_lossy(&page.body).contains("<title>OK</title>"));
    }

    #[tokio::test]
    async fn test_error_status_is_reported() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(500);
            })
            .await;
        let url = NormalizedUrl::parse(&server.url("/")).unwrap();

        let err = fetch_page(&client(), &url, Budget::new(Duration::from_secs(5)), 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Status { status: 500, .. }));
    }

    #[tokio::test]
    async fn test_body_is_capped() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body("x".repeat(10_000));
            })
            .await;
        let url = NormalizedUrl::parse(&server.url("/")).unwrap();

        let page = fetch_page(&client(), &url, Budget::new(Duration::from_secs(5)), 100)
            .await
            .unwrap();

        assert_eq!(page.body.len(), 100);
    }

    #[tokio::test]
    async fn test_slow_page_runs_out_of_budget() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(GET);
                then.status(200).body("late").delay(Duration::from_secs(5));
            })
            .await;
        let url = NormalizedUrl::parse(&server.url("/")).unwrap();

        let started = std::time::Instant::now();
        let err = fetch_page(&client(), &url, Budget::new(Duration::from_millis(200)), 1024)
            .await
            .unwrap_err();

        assert!(matches!(err, FetchError::Budget));
        assert!(started.elapsed() < Duration::from_secs(2));
    }
}
