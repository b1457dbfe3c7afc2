//! ## sentinel-telemetry::logging
//! **Structured logging with `tracing`**
//!
//! Installs the process-wide fmt subscriber. `RUST_LOG` wins over the
//! configured default level.

use tracing_subscriber::fmt::format::FmtSpan;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone)]
pub struct EventLogger;

impl EventLogger {
    /// Installs the global subscriber with `default_level` as fallback filter.
    ///
    /// Returns `false` if a subscriber was already installed (e.g. by a test
    /// harness); the existing one is left in place.
    pub fn init(default_level: &str) -> bool {
        fmt()
            .with_env_filter(Self::filter(default_level))
            .with_thread_names(true)
            .with_span_events(FmtSpan::NONE)
            .with_writer(std::io::stderr)
            .try_init()
            .is_ok()
    }

    fn filter(default_level: &str) -> EnvFilter {
        EnvFilter::try_from_default_env()
            .or_else(|_| EnvFilter::try_new(default_level))
            .unwrap_or_else(|_| EnvFilter::new("info"))
    }

    /// Records an operator-facing lifecycle event (start, stop, export).
    pub fn log_lifecycle(action: &str, detail: &str) {
        tracing::info!(action, detail, "Engine lifecycle event");
    }
}
