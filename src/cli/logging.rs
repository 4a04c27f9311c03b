//! Logging setup using tracing.
//!
//! Logs go to stderr so they never mix with slot output on stdout. The level
//! comes from `RUST_LOG`; `--verbose` raises the default to debug.

use tracing_subscriber::prelude::*;
use tracing_subscriber::EnvFilter;

/// Install the global subscriber. A second call is ignored.
pub fn init_logging(verbose: bool) {
    let default_directive = if verbose { "vox=debug" } else { "warn" };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_directive));

    let result = tracing_subscriber::registry()
        .with(env_filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();

    if result.is_ok() {
        tracing::debug!(verbose, "logging initialized");
    }
}
