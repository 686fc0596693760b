// src/inspect/markup.rs
// =============================================================================
// Parses the page and pulls out the raw facts the rest of the analysis needs:
// title, heading counts, link hrefs and forms.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM using html5ever (the same algorithm browsers use)
// - Never gives up on broken markup: missing closing tags are simply implied
// - Lets us query the tree with CSS selectors
//
// The selectors are compiled once in `MarkupScanner::new` and reused for
// every page.
//
// Rust concepts:
// - Fixed-size arrays: [usize; 6] holds one counter per heading level
// - Iterators: select() returns an iterator of matching elements
// =============================================================================

use crate::error::AnalyzeError;
use scraper::{ElementRef, Html, Selector};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Shown when a page has no title, or only whitespace in it.
pub const NO_TITLE: &str = "(no title)";

/// Heading counts for levels 1 to 6. All six levels are always present.
///
/// In JSON this is an object keyed by level: `{"1": 2, "2": 0, ...}`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "BTreeMap<usize, usize>", from = "BTreeMap<usize, usize>")]
pub struct HeadingCounts([usize; 6]);

impl HeadingCounts {
    /// Count for `level` (1..=6); any other level reads as 0.
    pub fn get(&self, level: usize) -> usize {
        match level {
            1..=6 => self.0[level - 1],
            _ => 0,
        }
    }

    fn bump(&mut self, level: usize) {
        if let 1..=6 = level {
            self.0[level - 1] += 1;
        }
    }

    /// (level, count) pairs from h1 to h6.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize)> + '_ {
        (1..=6).map(move |level| (level, self.get(level)))
    }
}

impl From<[usize; 6]> for HeadingCounts {
    fn from(counts: [usize; 6]) -> Self {
        Self(counts)
    }
}

// serde goes through a level -> count map so the levels show up as keys
impl From<HeadingCounts> for BTreeMap<usize, usize> {
    fn from(counts: HeadingCounts) -> Self {
        counts.iter().collect()
    }
}

// Levels outside 1..=6 are dropped, missing ones read as 0
impl From<BTreeMap<usize, usize>> for HeadingCounts {
    fn from(map: BTreeMap<usize, usize>) -> Self {
        let mut counts = Self::default();
        for (level, count) in map {
            if let 1..=6 = level {
                counts.0[level - 1] = count;
            }
        }
        counts
    }
}

/// One `<input>` inside a form.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormInput {
    pub kind: Option<String>,
    pub name: Option<String>,
}

/// A `<form>` and the inputs inside it, in document order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Form {
    pub inputs: Vec<FormInput>,
}

/// Everything the scanner extracted from one document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkupScan {
    pub title: String,
    pub headings: HeadingCounts,
    /// Raw href values, untrimmed and unfiltered (empty ones included)
    pub hrefs: Vec<String>,
    pub forms: Vec<Form>,
}

/// Compiled selectors for scanning documents.
#[derive(Debug, Clone)]
pub struct MarkupScanner {
    title: Selector,
    headings: [Selector; 6],
    aria_headings: Selector,
    anchors: Selector,
    forms: Selector,
    inputs: Selector,
}

fn compile(selector: &'static str) -> Result<Selector, AnalyzeError> {
    Selector::parse(selector).map_err(|e| AnalyzeError::Selector {
        selector,
        message: e.to_string(),
    })
}

impl MarkupScanner {
    pub fn new() -> Result<Self, AnalyzeError> {
        Ok(Self {
            title: compile("title")?,
            headings: [
                compile("h1")?,
                compile("h2")?,
                compile("h3")?,
                compile("h4")?,
                compile("h5")?,
                compile("h6")?,
            ],
            aria_headings: compile(r#"[role="heading"][aria-level]"#)?,
            anchors: compile("a[href]")?,
            forms: compile("form")?,
            inputs: compile("input")?,
        })
    }

    /// Parses `html` tolerantly and extracts title, headings, hrefs and forms.
    pub fn scan(&self, html: &str) -> MarkupScan {
        let document = Html::parse_document(html);

        MarkupScan {
            title: self.title(&document),
            headings: self.count_headings(&document),
            hrefs: document
                .select(&self.anchors)
                .filter_map(|a| a.value().attr("href"))
                .map(str::to_string)
                .collect(),
            forms: document
                .select(&self.forms)
                .map(|form| self.form(form))
                .collect(),
        }
    }

    fn title(&self, document: &Html) -> String {
        let title = document
            .select(&self.title)
            .next()
            .map(|el| el.text().collect::<String>())
            .unwrap_or_default();
        let title = title.trim();
        if title.is_empty() {
            NO_TITLE.to_string()
        } else {
            title.to_string()
        }
    }

    /// Native h1..h6 plus `role="heading"` elements with a numeric aria-level.
    fn count_headings(&self, document: &Html) -> HeadingCounts {
        let mut counts = HeadingCounts::default();

        for (i, selector) in self.headings.iter().enumerate() {
            for _ in document.select(selector) {
                counts.bump(i + 1);
            }
        }

        for el in document.select(&self.aria_headings) {
            // Non-numeric or out-of-range levels are ignored
            let level = el
                .value()
                .attr("aria-level")
                .map(str::trim)
                .filter(|v| v.bytes().all(|b| b.is_ascii_digit()))
                .and_then(|v| v.parse::<usize>().ok());
            if let Some(level @ 1..=6) = level {
                counts.bump(level);
            }
        }

        counts
    }

    fn form(&self, form: ElementRef<'_>) -> Form {
        Form {
            inputs: form
                .select(&self.inputs)
                .map(|input| FormInput {
                    kind: input.value().attr("type").map(str::to_string),
                    name: input.value().attr("name").map(str::to_string),
                })
                .collect(),
        }
    }
}
