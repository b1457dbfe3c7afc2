//! Snapshot publisher cadence.

use std::time::Duration;

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
pub struct PublisherConfig {
    /// Period between window rotations and snapshot deliveries (milliseconds).
    #[validate(range(min = 1, max = 3_600_000))]
    #[serde(default = "default_cadence")]
    pub cadence_ms: u64,
}

fn default_cadence() -> u64 {
    1000
}

impl PublisherConfig {
    pub fn cadence(&self) -> Duration {
        Duration::from_millis(self.cadence_ms)
    }
}

impl Default for PublisherConfig {
    fn default() -> Self {
        Self {
            cadence_ms: default_cadence(),
        }
    }
}
