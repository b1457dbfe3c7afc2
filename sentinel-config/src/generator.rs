//! Synthetic traffic generator configuration.
//!
//! Statistical parameters for the packet event source:
//! - Inter-arrival interval bounds
//! - Protocol weight table
//! - Packet size bounds
//! - Internal and external address pools

use serde::{Deserialize, Serialize};
use validator::{self, Validate};

use crate::validation;

/// Generator configuration.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = "validation::validate_generator_bounds"))]
pub struct GeneratorConfig {
    /// Lower bound of the randomized sleep between events (milliseconds).
    #[serde(default = "default_min_interval")]
    pub min_interval_ms: u64,

    /// Upper bound of the randomized sleep between events (milliseconds).
    #[validate(range(min = 1, max = 60_000))]
    #[serde(default = "default_max_interval")]
    pub max_interval_ms: u64,

    /// Smallest generated packet (bytes).
    #[validate(range(min = 1))]
    #[serde(default = "default_min_packet_size")]
    pub min_packet_size: u32,

    /// Largest generated packet (bytes).
    #[validate(range(min = 1, max = 65_535))]
    #[serde(default = "default_max_packet_size")]
    pub max_packet_size: u32,

    /// Relative protocol weights.
    #[validate(nested)]
    #[serde(default)]
    pub weights: ProtocolWeights,

    /// Source addresses, drawn uniformly.
    #[validate(custom(function = validation::validate_address_pool))]
    #[serde(default = "default_internal_pool")]
    pub internal_pool: Vec<String>,

    /// Destination addresses, drawn uniformly.
    #[validate(custom(function = validation::validate_address_pool))]
    #[serde(default = "default_external_pool")]
    pub external_pool: Vec<String>,

    /// Fixed RNG seed. Entropy-seeded when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
}

fn default_min_interval() -> u64 {
    50
}

fn default_max_interval() -> u64 {
    500
}

fn default_min_packet_size() -> u32 {
    64
}

fn default_max_packet_size() -> u32 {
    1500
}

fn default_internal_pool() -> Vec<String> {
    ["192.168.1.10", "192.168.1.55", "10.0.0.3"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_external_pool() -> Vec<String> {
    [
        "172.217.16.1 (Google)",
        "204.79.197.200 (Bing)",
        "140.82.112.4 (GitHub)",
        "185.60.216.35 (Meta)",
    ]
    .into_iter()
    .map(String::from)
    .collect()
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            min_interval_ms: default_min_interval(),
            max_interval_ms: default_max_interval(),
            min_packet_size: default_min_packet_size(),
            max_packet_size: default_max_packet_size(),
            weights: ProtocolWeights::default(),
            internal_pool: default_internal_pool(),
            external_pool: default_external_pool(),
            seed: None,
        }
    }
}

/// Weighted-choice table over the generated protocol labels.
#[derive(Debug, Serialize, Deserialize, Validate, Clone, PartialEq)]
#[validate(schema(function = "validation::validate_weight_sum"))]
pub struct ProtocolWeights {
    #[validate(range(min = 0.0))]
    pub tcp: f64,
    #[validate(range(min = 0.0))]
    pub udp: f64,
    #[validate(range(min = 0.0))]
    pub icmp: f64,
    #[validate(range(min = 0.0))]
    pub https: f64,
}

impl ProtocolWeights {
    /// Weights in `[tcp, udp, icmp, https]` order.
    pub fn as_array(&self) -> [f64; 4] {
        [self.tcp, self.udp, self.icmp, self.https]
    }
}

impl Default for ProtocolWeights {
    fn default() -> Self {
        Self {
            tcp: 40.0,
            udp: 30.0,
            icmp: 5.0,
            https: 25.0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use validator::Validate;

    #[test]
    fn valid_default_generator_config() {
        let config = GeneratorConfig::default();
        config.validate().expect("Default config should be valid");
        assert_eq!(config.weights.as_array(), [40.0, 30.0, 5.0, 25.0]);
    }

    #[test]
    fn inverted_interval_bounds() {
        let config = GeneratorConfig {
            min_interval_ms: 501,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn equal_interval_bounds_are_allowed() {
        let config = GeneratorConfig {
            min_interval_ms: 100,
            max_interval_ms: 100,
            ..GeneratorConfig::default()
        };
        config.validate().expect("a fixed interval is valid");
    }

    #[test]
    fn inverted_size_bounds() {
        let config = GeneratorConfig {
            min_packet_size: 2000,
            ..GeneratorConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn negative_weight() {
        let mut config = GeneratorConfig::default();
        config.weights.udp = -1.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn all_zero_weights() {
        let mut config = GeneratorConfig::default();
        config.weights = ProtocolWeights {
            tcp: 0.0,
            udp: 0.0,
            icmp: 0.0,
            https: 0.0,
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn empty_pool() {
        let mut config = GeneratorConfig::default();
        config.external_pool.clear();
        assert!(config.validate().is_err());
    }

    #[test]
    fn blank_pool_entry() {
        let mut config = GeneratorConfig::default();
        config.internal_pool.push("   ".into());
        assert!(config.validate().is_err());
    }
}
