//! Aggregation store sizing.

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

/// Rolling traffic window configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct AggregationConfig {
    /// Number of per-interval samples retained (N).
    #[validate(range(min = 1, max = 86_400))]
    #[serde(default = "default_window_capacity")]
    pub window_capacity: usize,
}

fn default_window_capacity() -> usize {
    60
}

impl Default for AggregationConfig {
    fn default() -> Self {
        Self {
            window_capacity: default_window_capacity(),
        }
    }
}
