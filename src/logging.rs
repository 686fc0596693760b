// src/logging.rs
// =============================================================================
// Sets up `tracing` output for the CLI.
//
// Log lines go to stderr so that `--json` output on stdout stays parseable.
// RUST_LOG wins when it is set; otherwise -v / -vv pick the level.
// =============================================================================

use anyhow::{anyhow, Result};
use tracing_subscriber::EnvFilter;

/// Installs the global subscriber. Call once, at startup.
pub fn init_logging(verbosity: u8) -> Result<()> {
    let default_filter = match verbosity {
        0 => "warn",
        1 => "warn,page_inspector=info",
        _ => "warn,page_inspector=debug",
    };

    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow!("failed to initialize logging: {}", e))?;

    tracing::debug!(filter = default_filter, "logging initialized");

    Ok(())
}
