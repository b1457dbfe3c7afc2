//! Per-protocol packet counters.

use serde::ser::SerializeMap;
use serde::{Serialize, Serializer};

use crate::events::Protocol;

/// Monotonic per-protocol counts for the current session.
///
/// Backed by a fixed array indexed by [`Protocol::index`]; the total is the
/// sum of the slots, so the two can never disagree.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ProtocolCounters {
    slots: [u64; Protocol::COUNT],
}

impl ProtocolCounters {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn increment(&mut self, protocol: Protocol) {
        self.slots[protocol.index()] += 1;
    }

    #[inline]
    pub fn get(&self, protocol: Protocol) -> u64 {
        self.slots[protocol.index()]
    }

    pub fn total(&self) -> u64 {
        self.slots.iter().sum()
    }

    /// `(protocol, count)` pairs in slot order, zero counts included.
    pub fn iter(&self) -> impl Iterator<Item = (Protocol, u64)> + '_ {
        Protocol::ALL.iter().map(move |&p| (p, self.get(p)))
    }

    /// Share of the total per protocol, `0.0` everywhere when nothing was counted.
    pub fn distribution(&self) -> [(Protocol, f64); Protocol::COUNT] {
        let total = self.total();
        Protocol::ALL.map(|p| {
            let share = if total == 0 {
                0.0
            } else {
                self.get(p) as f64 / total as f64
            };
            (p, share)
        })
    }

    pub fn clear(&mut self) {
        self.slots = [0; Protocol::COUNT];
    }
}

impl Serialize for ProtocolCounters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(Protocol::COUNT))?;
        for (protocol, count) in self.iter() {
            map.serialize_entry(protocol.as_str(), &count)?;
        }
        map.end()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_and_total() {
        let mut counters = ProtocolCounters::new();
        counters.increment(Protocol::Tcp);
        counters.increment(Protocol::Tcp);
        counters.increment(Protocol::Icmp);
        assert_eq!(counters.get(Protocol::Tcp), 2);
        assert_eq!(counters.get(Protocol::Udp), 0);
        assert_eq!(counters.total(), 3);
    }

    #[test]
    fn distribution_of_empty_counters_is_zero() {
        let counters = ProtocolCounters::new();
        assert!(counters.distribution().iter().all(|(_, share)| *share == 0.0));
    }

    #[test]
    fn distribution_sums_to_one() {
        let mut counters = ProtocolCounters::new();
        counters.increment(Protocol::Udp);
        counters.increment(Protocol::Https);
        counters.increment(Protocol::Https);
        counters.increment(Protocol::Https);
        let shares = counters.distribution();
        assert_eq!(shares[Protocol::Https.index()].1, 0.75);
        let sum: f64 = shares.iter().map(|(_, s)| s).sum();
        assert!((sum - 1.0).abs() < f64::EPSILON);
    }
}
