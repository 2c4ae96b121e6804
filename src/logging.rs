//! Logging initialization for hosts embedding the engine.
//!
//! The engine itself only emits `tracing` events; an interactive shell
//! that renders to the terminal will want to route them elsewhere.

use tracing_subscriber::EnvFilter;

/// Initializes logging to stderr, honoring `RUST_LOG` and defaulting to
/// `info`. Intended for headless use and test runs.
pub fn init_stderr_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();
}
