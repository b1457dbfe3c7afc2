//! Point-in-time copies of aggregate state.

use serde::Serialize;

use crate::events::PacketEvent;
use crate::store::{ProtocolCounters, TrafficWindow};
use crate::threat::ThreatLabel;

/// Aggregate state copied out of the store under a single lock.
#[derive(Clone, Debug, PartialEq)]
pub struct StoreSnapshot {
    /// Number of window rotations so far this session.
    pub sequence: u64,
    pub total_packets: u64,
    pub total_bytes: u64,
    pub counters: ProtocolCounters,
    pub window: TrafficWindow,
    pub last_event: Option<PacketEvent>,
}

impl StoreSnapshot {
    /// Attaches the classification and seals the snapshot.
    pub fn with_threat(self, threat: ThreatLabel) -> Snapshot {
        Snapshot {
            sequence: self.sequence,
            total_packets: self.total_packets,
            total_bytes: self.total_bytes,
            counters: self.counters,
            window: self.window,
            threat,
            last_event: self.last_event,
        }
    }
}

/// Immutable snapshot handed to the consumer once per cadence tick.
///
/// Fields are private; the consumer only reads.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    sequence: u64,
    total_packets: u64,
    total_bytes: u64,
    counters: ProtocolCounters,
    window: TrafficWindow,
    threat: ThreatLabel,
    last_event: Option<PacketEvent>,
}

impl Snapshot {
    pub fn sequence(&self) -> u64 {
        self.sequence
    }

    pub fn total_packets(&self) -> u64 {
        self.total_packets
    }

    pub fn total_bytes(&self) -> u64 {
        self.total_bytes
    }

    pub fn counters(&self) -> &ProtocolCounters {
        &self.counters
    }

    pub fn window(&self) -> &TrafficWindow {
        &self.window
    }

    pub fn threat(&self) -> ThreatLabel {
        self.threat
    }

    pub fn last_event(&self) -> Option<&PacketEvent> {
        self.last_event.as_ref()
    }

    /// Packets in the most recent interval.
    pub fn packets_per_interval(&self) -> u64 {
        self.window.latest()
    }
}
