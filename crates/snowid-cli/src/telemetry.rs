//! Structured logging for the `snowid` binary.
//!
//! Logs go to stderr so minted IDs on stdout stay pipeable. Filtering comes
//! from `RUST_LOG`, defaulting to `warn`; `RUST_LOG=snowid=trace` shows every
//! generation span, including sequence exhaustion and backward clock reads.

use tracing_subscriber::{EnvFilter, fmt};

/// Installs the global `tracing` subscriber.
pub fn init_tracing() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "warn".into()))
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(true)
        .init();
}
