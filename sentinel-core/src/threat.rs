//! ## sentinel-core::threat
//! **Coarse threat labelling**
//!
//! Placeholder heuristic, not a security analysis. It exists so a real
//! classifier can be dropped into the same slot without touching the
//! aggregation pipeline.

use std::fmt;

use serde::Serialize;

use crate::events::Protocol;
use crate::store::ProtocolCounters;

/// Discrete label shown by the threat indicator.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ThreatLabel {
    /// Periodic re-evaluation pulse.
    Analyzing,
    Secure,
    HighTraffic,
    #[default]
    Nominal,
}

impl ThreatLabel {
    /// Indicator text.
    pub const fn as_str(self) -> &'static str {
        match self {
            ThreatLabel::Analyzing => "ANALYZING...",
            ThreatLabel::Secure => "SECURE",
            ThreatLabel::HighTraffic => "HIGH TRAFFIC",
            ThreatLabel::Nominal => "NOMINAL",
        }
    }
}

impl fmt::Display for ThreatLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// Inputs a classifier may look at. Borrowed from a snapshot.
#[derive(Clone, Copy, Debug)]
pub struct ThreatInput<'a> {
    pub total: u64,
    pub counters: &'a ProtocolCounters,
    pub last_protocol: Option<Protocol>,
    /// Label produced on the previous tick.
    pub previous: ThreatLabel,
}

/// Replaceable classification slot.
pub trait ThreatClassifier: Send + Sync {
    /// Must be pure: equal inputs give equal labels.
    fn classify(&self, input: ThreatInput<'_>) -> ThreatLabel;
}

/// Default heuristic. See [`classify`].
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicClassifier;

impl ThreatClassifier for HeuristicClassifier {
    fn classify(&self, input: ThreatInput<'_>) -> ThreatLabel {
        classify(input.total, input.counters, input.last_protocol, input.previous)
    }
}

/// Maps aggregate state to a label:
///
/// 1. `total % 100 < 5` → `Analyzing`
/// 2. last event HTTPS → `Secure`
/// 3. last event UDP → `HighTraffic`
/// 4. otherwise the previous label is kept
///
/// `counters` are accepted so replacements share the signature; this
/// heuristic does not read them.
pub fn classify(
    total: u64,
    _counters: &ProtocolCounters,
    last_protocol: Option<Protocol>,
    previous: ThreatLabel,
) -> ThreatLabel {
    if total % 100 < 5 {
        return ThreatLabel::Analyzing;
    }
    match last_protocol {
        Some(Protocol::Https) => ThreatLabel::Secure,
        Some(Protocol::Udp) => ThreatLabel::HighTraffic,
        _ => previous,
    }
}
