//! Observability configuration.
//!
//! Parameters for system instrumentation:
//! - Log verbosity
//! - Metrics collection

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Telemetry configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct TelemetryConfig {
    /// Default log level when `RUST_LOG` is not set.
    #[validate(custom(function = validation::validate_log_level))]
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Record Prometheus metrics.
    #[serde(default = "default_true")]
    pub metrics: bool,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_true() -> bool {
    true
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            metrics: default_true(),
        }
    }
}
