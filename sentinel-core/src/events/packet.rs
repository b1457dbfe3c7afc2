//! Packet event type and its feed-line rendering.

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Local};
use serde::Serialize;

use super::Protocol;

/// Wall-clock rendering used by the live feed and the export log.
pub const TIME_FORMAT: &str = "%H:%M:%S";

/// A single synthetic packet observation. Never mutated after construction.
///
/// Addresses are shared `Arc<str>` handles into the generator's pools, so
/// cloning an event (e.g. when the log is copied for export) does not copy
/// address text.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct PacketEvent {
    /// Local wall-clock time at generation.
    pub timestamp: DateTime<Local>,

    pub protocol: Protocol,

    /// Source address, from the internal pool.
    pub source: Arc<str>,

    /// Destination address, from the external pool.
    pub destination: Arc<str>,

    /// Packet size in bytes.
    pub size: u32,
}

impl PacketEvent {
    #[inline]
    pub fn new(
        timestamp: DateTime<Local>,
        protocol: Protocol,
        source: impl Into<Arc<str>>,
        destination: impl Into<Arc<str>>,
        size: u32,
    ) -> Self {
        Self {
            timestamp,
            protocol,
            source: source.into(),
            destination: destination.into(),
            size,
        }
    }

    /// `HH:MM:SS` rendering of the timestamp.
    pub fn clock_time(&self) -> String {
        self.timestamp.format(TIME_FORMAT).to_string()
    }
}

/// Renders the single-line feed entry `[HH:MM:SS] PROTO | SRC >> DST`,
/// with the protocol padded to 5 columns and the source to 15.
impl fmt::Display for PacketEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "[{}] {:<5} | {:<15} >> {}",
            self.timestamp.format(TIME_FORMAT),
            self.protocol,
            self.source,
            self.destination
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn at(h: u32, m: u32, s: u32) -> DateTime<Local> {
        Local
            .with_ymd_and_hms(2024, 3, 1, h, m, s)
            .single()
            .expect("unambiguous local time")
    }

    #[test]
    fn feed_line_layout() {
        let event = PacketEvent::new(
            at(9, 5, 7),
            Protocol::Udp,
            "10.0.0.3",
            "140.82.112.4 (GitHub)",
            512,
        );
        assert_eq!(
            event.to_string(),
            "[09:05:07] UDP   | 10.0.0.3        >> 140.82.112.4 (GitHub)"
        );
    }

    #[test]
    fn long_source_is_not_truncated() {
        let event = PacketEvent::new(
            at(23, 59, 59),
            Protocol::Https,
            "192.168.100.200",
            "x",
            64,
        );
        assert_eq!(event.to_string(), "[23:59:59] HTTPS | 192.168.100.200 >> x");
        assert_eq!(event.clock_time(), "23:59:59");
    }
}
