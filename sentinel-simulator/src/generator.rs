//! Randomized synthetic traffic.
//!
//! Every draw comes from one `SmallRng`, so a fixed seed reproduces the
//! exact sequence of delays, protocols, addresses and sizes.

use std::ops::RangeInclusive;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Local};
use rand::distr::weighted::WeightedIndex;
use rand::distr::Distribution;
use rand::rngs::SmallRng;
use rand::{Rng, SeedableRng};
use validator::Validate;

use sentinel_config::{ConfigError, GeneratorConfig};
use sentinel_core::events::{PacketEvent, Protocol};

use crate::driver::TrafficSource;

/// Weighted random packet source built from a [`GeneratorConfig`].
#[derive(Debug, Clone)]
pub struct TrafficGenerator {
    rng: SmallRng,
    /// Inter-event delay bounds in microseconds.
    delay_us: RangeInclusive<u64>,
    sizes: RangeInclusive<u32>,
    protocols: WeightedIndex<f64>,
    internal: Vec<Arc<str>>,
    external: Vec<Arc<str>>,
}

impl TrafficGenerator {
    /// Validates `config` and builds a generator from it.
    ///
    /// Seeded from `config.seed` when present, otherwise from OS entropy.
    pub fn from_config(config: &GeneratorConfig) -> Result<Self, ConfigError> {
        config.validate()?;

        let protocols = WeightedIndex::new(config.weights.as_array())
            .map_err(|e| ConfigError::Invalid(format!("protocol weights: {e}")))?;

        let rng = match config.seed {
            Some(seed) => SmallRng::seed_from_u64(seed),
            None => SmallRng::from_rng(&mut rand::rng()),
        };

        Ok(Self {
            rng,
            delay_us: config.min_interval_ms * 1_000..=config.max_interval_ms * 1_000,
            sizes: config.min_packet_size..=config.max_packet_size,
            protocols,
            internal: config.internal_pool.iter().map(|a| Arc::from(a.trim())).collect(),
            external: config.external_pool.iter().map(|a| Arc::from(a.trim())).collect(),
        })
    }

    pub fn next_protocol(&mut self) -> Protocol {
        Protocol::ALL[self.protocols.sample(&mut self.rng)]
    }

    fn pick(rng: &mut SmallRng, pool: &[Arc<str>]) -> Arc<str> {
        // pools are validated non-empty
        pool[rng.random_range(0..pool.len())].clone()
    }
}

impl TrafficSource for TrafficGenerator {
    fn next_delay(&mut self) -> Duration {
        Duration::from_micros(self.rng.random_range(self.delay_us.clone()))
    }

    fn next_packet(&mut self, timestamp: DateTime<Local>) -> PacketEvent {
        let source = Self::pick(&mut self.rng, &self.internal);
        let destination = Self::pick(&mut self.rng, &self.external);
        let protocol = self.next_protocol();
        let size = self.rng.random_range(self.sizes.clone());
        PacketEvent::new(timestamp, protocol, source, destination, size)
    }
}
