//! Tracing initialization for TCK processes.

use tracing_subscriber::EnvFilter;

/// Initializes tracing for a test process.
///
/// Safe to call from every test; only the first call installs the
/// subscriber. The filter defaults to info for the TCK crates and is
/// overridable via `RUST_LOG`.
pub fn init_tracing() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("tck_http=info,tck_provision=info,tck_stub=info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
