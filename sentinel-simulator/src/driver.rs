//! Defines the TrafficSource trait for plugging different event generation strategies
//! into the producer loop.

use std::time::Duration;

use chrono::{DateTime, Local};
use sentinel_core::events::PacketEvent;

pub trait TrafficSource: Send {
    /// How long the producer waits before emitting the next event.
    fn next_delay(&mut self) -> Duration;

    /// Builds the next event, stamped with `timestamp`.
    fn next_packet(&mut self, timestamp: DateTime<Local>) -> PacketEvent;
}
