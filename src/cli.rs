// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// We use the "derive" API which lets us define the CLI structure using
// Rust structs and attributes (the #[...] things).
//
// Every tunable can also come from an environment variable (clap's "env"
// feature), which is handy in CI where flags are awkward to pass around.
//
// Rust concepts:
// - Structs: Custom data types that group related data
// - Derive macros: Automatically generate parsing code for our types
// =============================================================================

use crate::config::{
    AnalyzerConfig, DEFAULT_BUDGET_SECS, DEFAULT_CHECKED_LINKS_CAP, DEFAULT_MAX_BODY_BYTES,
    DEFAULT_PER_LINK_TIMEOUT_SECS, DEFAULT_POOL_SIZE, DEFAULT_PROBE_BODY_BYTES,
};
use clap::{ArgAction, Parser};
use std::time::Duration;

// #[derive(Parser)] tells clap to automatically generate parsing code
// The #[command(...)] attributes configure how the CLI behaves
#[derive(Parser, Debug)]
#[command(
    name = "page-inspector",
    version,
    about = "Analyze a web page: HTML version, title, headings, login forms and link reachability",
    long_about = "page-inspector fetches a single page and reports its HTML version, title, \
                  heading counts, whether it has a login form, and how many of its links \
                  are inaccessible. The whole run is bounded by one time budget; when it \
                  runs out during link checking, the links checked so far are reported."
)]
pub struct Cli {
    /// Page to analyze (e.g., https://example.com or just example.com)
    ///
    /// When no scheme is given, https:// is assumed.
    pub url: String,

    /// Output the report in JSON format instead of a table
    #[arg(long)]
    pub json: bool,

    /// Maximum number of unique links to check
    #[arg(long, env = "PAGE_INSPECTOR_MAX_LINKS", default_value_t = DEFAULT_CHECKED_LINKS_CAP)]
    pub max_links: usize,

    /// Number of links checked at the same time
    #[arg(long, env = "PAGE_INSPECTOR_WORKERS", default_value_t = DEFAULT_POOL_SIZE)]
    pub workers: usize,

    /// Seconds allowed for checking a single link
    #[arg(long, env = "PAGE_INSPECTOR_LINK_TIMEOUT", default_value_t = DEFAULT_PER_LINK_TIMEOUT_SECS)]
    pub link_timeout: u64,

    /// Seconds allowed for the whole analysis, page download included
    #[arg(long, env = "PAGE_INSPECTOR_BUDGET", default_value_t = DEFAULT_BUDGET_SECS)]
    pub budget: u64,

    /// Largest page body (in bytes) that is read and analyzed
    #[arg(long, env = "PAGE_INSPECTOR_MAX_BODY", default_value_t = DEFAULT_MAX_BODY_BYTES)]
    pub max_body: usize,

    /// More log output on stderr (-v = info, -vv = debug)
    #[arg(short, long, action = ArgAction::Count)]
    pub verbose: u8,
}

impl Cli {
    /// The analysis settings selected by the flags.
    pub fn config(&self) -> AnalyzerConfig {
        AnalyzerConfig {
            checked_links_cap: self.max_links,
            pool_size: self.workers.max(1),
            per_link_timeout: Duration::from_secs(self.link_timeout),
            budget: Duration::from_secs(self.budget),
            max_body_bytes: self.max_body,
            probe_body_bytes: DEFAULT_PROBE_BODY_BYTES,
        }
    }
}
