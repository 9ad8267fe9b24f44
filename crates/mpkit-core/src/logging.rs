//! Tracing subscriber setup for binaries.
//!
//! Library crates only emit `tracing` events; installing a subscriber is the
//! binary's job.

/// Initialize the global tracing subscriber with stderr output.
///
/// `RUST_LOG` wins when set; otherwise `level` is used as the filter.
/// Subsequent calls are no-ops.
pub fn init_subscriber(level: &str) {
    use tracing_subscriber::EnvFilter;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let subscriber = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr)
        .compact();

    // set_global_default is a no-op if already set
    let _ = subscriber.try_init();
}

// ─────────────────────────────────────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────────────────────────────────────
