// src/page/mod.rs
// =============================================================================
// Everything about getting hold of the page itself.
//
// Submodules:
// - normalize: Normalizes user input and compares hosts
// - fetch: Downloads the page once, under the shared budget
// =============================================================================

mod fetch;
mod normalize;

pub use fetch::fetch_page;
pub use normalize::NormalizedUrl;
