// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Normalize the URL and start the time budget
// 3. Fetch the page once and run the analysis on it
// 4. Print the report as a table or as JSON
// 5. Exit with proper code (0 = all links fine, 1 = inaccessible links, 2 = error)
//
// Rust concepts used:
// - async/await: The page fetch and link checks are network I/O
// - Result<T, E>: For error handling, with anyhow adding context
// =============================================================================

// Module declarations - tells Rust about our other source files
mod budget; // src/budget.rs - the shared deadline
mod checker; // src/checker/ - link reachability checking
mod cli; // src/cli.rs - command-line parsing
mod config; // src/config.rs - tunables and the HTTP client
mod error; // src/error.rs - typed errors
mod inspect; // src/inspect/ - the analysis pipeline
mod logging; // src/logging.rs - tracing setup
mod page; // src/page/ - URL normalization and page fetching

// External crate imports
use anyhow::{Context, Result}; // anyhow: easy error handling with context
use clap::Parser; // Parser trait: gives us Cli::parse()
use reqwest::Client; // the HTTP client shared by the fetch and the link checks
use serde::Serialize; // lets the report be printed as JSON
use std::time::Instant; // wall clock for the "took N ms" line
use tracing::info; // structured log events (go to stderr)

// Internal imports from our own modules
use budget::Budget;
use cli::Cli;
use config::AnalyzerConfig;
use inspect::{AnalysisResult, Analyzer};
use page::{fetch_page, NormalizedUrl};

/// Everything printed for one run.
#[derive(Debug, Serialize)]
struct Report {
    input_url: String,
    final_url: String,
    http_status: u16,
    elapsed_ms: u64,
    /// The deadline passed before link checking finished
    budget_exhausted: bool,
    config: AnalyzerConfig,
    result: AnalysisResult,
}

#[tokio::main]
async fn main() {
    let exit_code = match run().await {
        Ok(code) => code,
        Err(e) => {
            // {:#} prints the whole context chain on one line
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

// Returns:
//   Ok(0) = analysis done, no inaccessible links
//   Ok(1) = analysis done, some links are inaccessible
//   Err   = bad URL, failed fetch, or unparseable page
async fn run() -> Result<i32> {
    // Parse command-line arguments (clap handles --help and errors for us)
    let cli = Cli::parse();

    // Logging goes to stderr, so it never mixes with the JSON on stdout
    logging::init_logging(cli.verbose)?;

    // One client for the whole run: it keeps a connection pool
    let config = cli.config();
    let client = config
        .http_client()
        .context("failed to build HTTP client")?;

    let report = analyze_url(client, &cli.url, config).await?;

    print_report(&report, cli.json)?;

    // Any inaccessible link makes the exit code 1
    if report.result.inaccessible_links > 0 {
        Ok(1)
    } else {
        Ok(0)
    }
}

/// Normalizes `raw`, fetches it and analyzes it, all under one budget.
///
/// Links are resolved against the normalized request URL. The URL the
/// redirects ended at is only reported.
async fn analyze_url(client: Client, raw: &str, config: AnalyzerConfig) -> Result<Report> {
    // Step 1: turn user input into an absolute http(s) URL
    let url = NormalizedUrl::parse(raw).with_context(|| format!("cannot analyze {:?}", raw))?;

    // Step 2: start the clock; everything below shares this one deadline
    let started = Instant::now();
    let budget = Budget::new(config.budget);

    // Step 3: download the page once
    let page = fetch_page(&client, &url, budget, config.max_body_bytes)
        .await
        .with_context(|| format!("failed to fetch {}", url))?;

    // Step 4: analyze it, probing links with whatever budget is left
    let analyzer = Analyzer::new(client, config.clone())?;
    let result = analyzer
        .analyze(budget, &url, &page.body)
        .await
        .with_context(|| format!("failed to analyze {}", page.final_url))?;

    let elapsed_ms = started.elapsed().as_millis() as u64;
    let budget_exhausted = budget.is_exhausted();
    info!(elapsed_ms, budget_exhausted, "analysis finished");

    Ok(Report {
        input_url: raw.trim().to_string(),
        final_url: page.final_url,
        http_status: page.status,
        elapsed_ms,
        budget_exhausted,
        config,
        result,
    })
}

// Prints the report either as a table or JSON
fn print_report(report: &Report, json: bool) -> Result<()> {
    if json {
        let json_output = serde_json::to_string_pretty(report)?;
        println!("{}", json_output);
    } else {
        print_table(report);
    }
    Ok(())
}

// Prints the report as a human-readable table in the terminal
fn print_table(report: &Report) {
    let result = &report.result;

    println!("🔍 {}", report.input_url);
    if report.final_url != report.input_url {
        println!("   ↪ {}", report.final_url);
    }
    println!();

    println!("{:<24} {}", "HTTP status", report.http_status);
    println!("{:<24} {}", "HTML version", result.html_version);
    println!("{:<24} {}", "Title", result.title);
    println!("{:<24} {}", "Login form", if result.has_login { "yes" } else { "no" });
    println!("{}", "=".repeat(48));

    for (level, count) in result.headings.iter() {
        println!("{:<24} {}", format!("h{}", level), count);
    }
    println!("{}", "=".repeat(48));

    println!("{:<24} {}", "Internal links", result.internal_links);
    println!("{:<24} {}", "External links", result.external_links);
    println!(
        "{:<24} {} (cap {})",
        "Checked links", result.checked_links, result.checked_links_cap
    );
    println!("{:<24} {}", "Inaccessible links", result.inaccessible_links);
    println!();

    if report.budget_exhausted {
        println!(
            "⏱️  The {}s budget ran out: only {} link(s) were checked",
            report.config.budget.as_secs(),
            result.checked_links
        );
    }

    println!("📊 Summary:");
    if result.inaccessible_links == 0 {
        println!("   ✅ No inaccessible links found");
    } else {
        println!("   ❌ {} inaccessible link(s)", result.inaccessible_links);
    }
    println!("   ⏲️  {} ms", report.elapsed_ms);
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;

    fn client() -> Client {
        Client::builder().no_proxy().build().unwrap()
    }

    #[tokio::test]
    async fn test_links_resolve_against_requested_url_after_redirect() {
        let server = MockServer::start_async().await;
        // same server, reached under a different host name after the redirect
        let moved_to = format!("http://localhost:{}/page", server.port());
        server
            .mock_async(|when, then| {
                when.method(GET).path("/start");
                then.status(302).header("Location", moved_to.as_str());
            })
            .await;
        let page = format!(
            r#"<!doctype html><title>Moved</title>
            <a href="http://127.0.0.1:{}/x">abs</a><a href="/rel">rel</a>"#,
            server.port()
        );
        server
            .mock_async(|when, then| {
                when.method(GET).path("/page");
                then.status(200).body(page.as_str());
            })
            .await;

        let report = analyze_url(client(), &server.url("/start"), AnalyzerConfig::default())
            .await
            .unwrap();

        assert_eq!(report.final_url, moved_to);
        assert_eq!(report.result.title, "Moved");
        assert_eq!(report.result.internal_links, 2);
        assert_eq!(report.result.external_links, 0);
    }

    #[tokio::test]
    async fn test_bad_input_is_an_error() {
        let err = analyze_url(client(), "ftp://example.com", AnalyzerConfig::default())
            .await
            .unwrap_err();
        assert!(format!("{:#}", err).contains("ftp://example.com"));
    }
}
