//! Delivery surface towards the presentation layer.
//!
//! The engine never lets a consumer poll shared state. It calls a sink once
//! per ingested event and once per cadence tick; the sink decides which
//! execution context the data ends up on.

use crossbeam::channel::{self, Receiver, Sender};
use tracing::trace;

use sentinel_core::snapshot::Snapshot;

pub trait FeedSink: Send + Sync {
    /// One formatted feed line per ingested event.
    fn on_log_line(&self, line: String);

    /// One snapshot per publish tick.
    fn on_snapshot(&self, snapshot: Snapshot);
}

/// Everything a [`ChannelSink`] forwards.
#[derive(Debug, Clone, PartialEq)]
pub enum FeedUpdate {
    LogLine(String),
    Snapshot(Snapshot),
}

/// Forwards updates over a crossbeam channel so a UI thread can drain them
/// at its own pace.
#[derive(Debug, Clone)]
pub struct ChannelSink {
    tx: Sender<FeedUpdate>,
}

impl ChannelSink {
    pub fn unbounded() -> (Self, Receiver<FeedUpdate>) {
        let (tx, rx) = channel::unbounded();
        (Self { tx }, rx)
    }

    fn forward(&self, update: FeedUpdate) {
        // a dropped receiver means the consumer went away; nothing to deliver to
        if self.tx.send(update).is_err() {
            trace!("Feed consumer disconnected, update discarded");
        }
    }
}

impl FeedSink for ChannelSink {
    fn on_log_line(&self, line: String) {
        self.forward(FeedUpdate::LogLine(line));
    }

    fn on_snapshot(&self, snapshot: Snapshot) {
        self.forward(FeedUpdate::Snapshot(snapshot));
    }
}

/// Discards everything. For headless runs that only export.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl FeedSink for NullSink {
    fn on_log_line(&self, _line: String) {}

    fn on_snapshot(&self, _snapshot: Snapshot) {}
}
