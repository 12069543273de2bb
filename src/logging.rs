//! Tracing subscriber setup for shell binaries.

use tracing_subscriber::EnvFilter;

/// Install the global fmt subscriber.
///
/// Filtering follows `RUST_LOG`, defaulting to `info`. Repeated calls are
/// no-ops, so tests and embedders may initialize unconditionally. Library
/// types never call this themselves.
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
