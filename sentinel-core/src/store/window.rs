//! Fixed-capacity rolling window of per-interval packet counts.

use std::collections::VecDeque;

use serde::Serialize;

/// Ring buffer of the N most recent per-interval counts, oldest first.
///
/// Always exactly `capacity` samples long: it starts zero-filled and every
/// push evicts the oldest sample.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct TrafficWindow {
    samples: VecDeque<u64>,
}

impl TrafficWindow {
    /// Creates a zero-filled window. A capacity of zero is raised to one.
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            samples: VecDeque::from(vec![0; capacity]),
        }
    }

    /// Appends a sample, evicting the oldest.
    pub fn push(&mut self, sample: u64) {
        self.samples.pop_front();
        self.samples.push_back(sample);
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.samples.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Most recent sample.
    pub fn latest(&self) -> u64 {
        self.samples.back().copied().unwrap_or(0)
    }

    pub fn peak(&self) -> u64 {
        self.samples.iter().copied().max().unwrap_or(0)
    }

    /// Y-axis ceiling for rate charts: `max(peak + 10, 20)`.
    pub fn chart_ceiling(&self) -> u64 {
        (self.peak() + 10).max(20)
    }

    pub fn iter(&self) -> impl Iterator<Item = u64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<u64> {
        self.samples.iter().copied().collect()
    }

    /// Zero-fills in place, keeping the capacity.
    pub fn clear(&mut self) {
        self.samples.iter_mut().for_each(|s| *s = 0);
    }
}
