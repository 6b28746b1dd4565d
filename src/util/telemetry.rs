//! Telemetry helpers for structured logging and tracing.

use tracing_subscriber::EnvFilter;

/// Initialize tracing for demos, tests, and small binaries. Applications
/// embedding the scheduler install their own subscriber; this helper
/// installs an env-based fmt subscriber only if none is set.
///
/// Filtering follows `RUST_LOG` when present and falls back to
/// `fairshare=info`, which keeps client registrations and pool lifecycle
/// transitions visible without per-job noise (worker pickup and idle events
/// log at `debug`).
pub fn init_tracing() {
    if tracing::dispatcher::has_been_set() {
        return;
    }
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("fairshare=info"));
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();
}
