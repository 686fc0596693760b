// src/checker/mod.rs
// =============================================================================
// Link reachability checking.
//
// Submodules:
// - pool: A reusable fixed-size worker pool with a deadline
// - http: Probes links (HEAD, then GET when HEAD is refused) and counts them
//
// Rust concepts:
// - Modules: Organize code into namespaces
// - pub use: Re-export items so callers write `checker::check_links()`
// =============================================================================

mod http;
mod pool;

pub use http::check_links;
