// src/inspect/mod.rs
// =============================================================================
// The analysis pipeline: raw page bytes in, AnalysisResult out.
//
// Steps, in order:
// 1. doctype: HTML version from the raw bytes (works even on broken markup)
// 2. markup: title, headings, hrefs and forms from the parsed document
// 3. links: hrefs -> absolute links tagged internal/external
// 4. login: does any form look like a login form?
// 5. checker: probe the links with whatever budget is left
//
// Steps 1-4 are synchronous and finish before anything is awaited, so the
// parsed document never has to live across an .await.
// =============================================================================

mod doctype;
mod links;
mod login;
mod markup;

pub use doctype::HtmlVersion;
pub use links::Link;
pub use markup::HeadingCounts;

use crate::budget::Budget;
use crate::checker::check_links;
use crate::config::AnalyzerConfig;
use crate::error::AnalyzeError;
use crate::page::NormalizedUrl;
use doctype::DoctypeClassifier;
use links::{classify_links, LinkCounts};
use markup::MarkupScanner;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

/// How many leading bytes are sniffed for binary content.
const SNIFF_LEN: usize = 1024;

/// The report for one analyzed page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub html_version: HtmlVersion,
    pub title: String,
    pub headings: HeadingCounts,
    pub internal_links: usize,
    pub external_links: usize,
    pub inaccessible_links: usize,
    pub checked_links: usize,
    pub checked_links_cap: usize,
    pub has_login: bool,
}

/// What the synchronous steps found, before any network I/O.
#[derive(Debug)]
struct PageFacts {
    title: String,
    headings: HeadingCounts,
    links: Vec<Link>,
    has_login: bool,
}

/// Runs the analysis pipeline. Build it once and reuse it for many pages.
pub struct Analyzer {
    doctype: DoctypeClassifier,
    scanner: MarkupScanner,
    client: Client,
    config: AnalyzerConfig,
}

impl Analyzer {
    pub fn new(client: Client, config: AnalyzerConfig) -> Result<Self, AnalyzeError> {
        Ok(Self {
            doctype: DoctypeClassifier::new()?,
            scanner: MarkupScanner::new()?,
            client,
            config,
        })
    }

    /// Analyzes `html`, resolving links against `base`.
    ///
    /// Only fails when the body isn't markup at all. Link checking that runs
    /// out of budget still returns Ok, with `checked_links` showing how far it
    /// got.
    pub async fn analyze(
        &self,
        budget: Budget,
        base: &NormalizedUrl,
        html: &[u8],
    ) -> Result<AnalysisResult, AnalyzeError> {
        let html_version = self.doctype.classify(html);
        let facts = self.inspect(base, html)?;
        let counts = LinkCounts::of(&facts.links);

        debug!(
            %html_version,
            internal = counts.internal,
            external = counts.external,
            has_login = facts.has_login,
            "page inspected"
        );

        let tally = check_links(&self.client, &facts.links, &self.config, budget).await;

        Ok(AnalysisResult {
            html_version,
            title: facts.title,
            headings: facts.headings,
            internal_links: counts.internal,
            external_links: counts.external,
            inaccessible_links: tally.inaccessible,
            checked_links: tally.checked,
            checked_links_cap: self.config.checked_links_cap,
            has_login: facts.has_login,
        })
    }

    fn inspect(&self, base: &NormalizedUrl, html: &[u8]) -> Result<PageFacts, AnalyzeError> {
        let sniff = &html[..html.len().min(SNIFF_LEN)];
        if sniff.contains(&0) {
            return Err(AnalyzeError::Parse(
                "content is binary, not markup".to_string(),
            ));
        }

        let text = String::from_utf8_lossy(html);
        let scan = self.scanner.scan(&text);
        let links = classify_links(base, &scan.hrefs);
        let has_login = login::has_login(&scan.forms);

        Ok(PageFacts {
            title: scan.title,
            headings: scan.headings,
            links,
            has_login,
        })
    }
}
