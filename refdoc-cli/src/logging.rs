//! Diagnostic logging for the CLI.
//!
//! - **Tracing (this module)**: per-file failures and debug traces via
//!   `RUST_LOG`, written to stderr.
//! - **Summary**: the end-of-run report printed to stdout by `main`,
//!   unaffected by `RUST_LOG`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Initialize the tracing subscriber.
///
/// Reads `RUST_LOG`. Defaults to `warn` if unset, so each per-file failure
/// still produces one diagnostic line.
///
/// # Example
/// ```bash
/// RUST_LOG=refdoc_core=debug refdoc-fixup doc/html
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).compact())
        .init();
}
