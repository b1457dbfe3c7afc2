//! ## sentinel-core::store
//! **Aggregation store: the single shared-state boundary**
//!
//! Holds protocol counters, the append-only event log, the per-interval tally
//! and the rolling traffic window behind one `parking_lot::Mutex`. Every
//! operation takes the lock exactly once and releases it before returning, so
//! readers can never observe counters that disagree with the total or a
//! half-rotated window.

pub mod counters;
pub mod window;

use std::ops::Range;

use parking_lot::Mutex;
use tracing::{debug, trace};

use crate::error::StateError;
use crate::events::PacketEvent;
use crate::snapshot::StoreSnapshot;

pub use counters::ProtocolCounters;
pub use window::TrafficWindow;

struct StoreState {
    active: bool,
    /// Bumped on every reset so log readers can detect a cleared log.
    session: u64,
    counters: ProtocolCounters,
    total_packets: u64,
    total_bytes: u64,
    log: Vec<PacketEvent>,
    window: TrafficWindow,
    /// Packets ingested since the last rotation.
    interval_tally: u64,
    rotations: u64,
}

impl StoreState {
    fn new(window_capacity: usize) -> Self {
        Self {
            active: false,
            session: 0,
            counters: ProtocolCounters::new(),
            total_packets: 0,
            total_bytes: 0,
            log: Vec::new(),
            window: TrafficWindow::new(window_capacity),
            interval_tally: 0,
            rotations: 0,
        }
    }

    fn clear(&mut self) {
        self.session += 1;
        self.counters.clear();
        self.total_packets = 0;
        self.total_bytes = 0;
        self.log.clear();
        self.window.clear();
        self.interval_tally = 0;
        self.rotations = 0;
    }
}

/// A stable view of the log length at one instant, used to export a
/// consistent prefix while ingestion continues.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LogCursor {
    session: u64,
    len: usize,
}

impl LogCursor {
    /// Number of events visible when the cursor was taken.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

/// Thread-safe accumulator shared by the producer and publisher timelines.
pub struct AggregationStore {
    state: Mutex<StoreState>,
    window_capacity: usize,
}

impl AggregationStore {
    /// Creates an idle store with a zero-filled window of `window_capacity` samples.
    pub fn new(window_capacity: usize) -> Self {
        let window_capacity = window_capacity.max(1);
        Self {
            state: Mutex::new(StoreState::new(window_capacity)),
            window_capacity,
        }
    }

    pub fn window_capacity(&self) -> usize {
        self.window_capacity
    }

    pub fn is_active(&self) -> bool {
        self.state.lock().active
    }

    /// Clears all session state and marks the store active, atomically.
    pub fn begin_session(&self) -> Result<(), StateError> {
        let mut state = self.state.lock();
        if state.active {
            return Err(StateError::Active("begin_session"));
        }
        state.clear();
        state.active = true;
        debug!(session = state.session, "Aggregation session started");
        Ok(())
    }

    /// Marks the store idle. Further ingestion is rejected.
    pub fn end_session(&self) -> Result<(), StateError> {
        let mut state = self.state.lock();
        if !state.active {
            return Err(StateError::NotActive("end_session"));
        }
        state.active = false;
        debug!(
            session = state.session,
            total = state.total_packets,
            "Aggregation session ended"
        );
        Ok(())
    }

    /// Records one event: appends it to the log and bumps its protocol
    /// counter, the running totals and the interval tally.
    ///
    /// All-or-nothing: the only failure is the state check, which happens
    /// before anything is touched. Returns the new total packet count.
    pub fn ingest(&self, event: PacketEvent) -> Result<u64, StateError> {
        let mut state = self.state.lock();
        if !state.active {
            return Err(StateError::NotActive("ingest"));
        }
        state.counters.increment(event.protocol);
        state.total_packets += 1;
        state.total_bytes += u64::from(event.size);
        state.interval_tally += 1;
        trace!(total = state.total_packets, protocol = %event.protocol, "Ingested packet");
        state.log.push(event);
        debug_assert_eq!(state.counters.total(), state.total_packets);
        Ok(state.total_packets)
    }

    /// Pushes the current interval tally into the window and zeroes it.
    /// Returns the sample that was pushed.
    pub fn rotate_window(&self) -> Result<u64, StateError> {
        let mut state = self.state.lock();
        if !state.active {
            return Err(StateError::NotActive("rotate_window"));
        }
        let sample = std::mem::take(&mut state.interval_tally);
        state.window.push(sample);
        state.rotations += 1;
        Ok(sample)
    }

    /// Copies totals, counters, window and the latest event under one lock.
    pub fn snapshot(&self) -> Result<StoreSnapshot, StateError> {
        let state = self.state.lock();
        if !state.active {
            return Err(StateError::NotActive("snapshot"));
        }
        Ok(StoreSnapshot {
            sequence: state.rotations,
            total_packets: state.total_packets,
            total_bytes: state.total_bytes,
            counters: state.counters,
            window: state.window.clone(),
            last_event: state.log.last().cloned(),
        })
    }

    /// Clears counters, log and window. Only legal while idle.
    pub fn reset(&self) -> Result<(), StateError> {
        let mut state = self.state.lock();
        if state.active {
            return Err(StateError::Active("reset"));
        }
        state.clear();
        debug!(session = state.session, "Aggregation store reset");
        Ok(())
    }

    /// Marks the current end of the log. Legal in any state.
    pub fn log_cursor(&self) -> LogCursor {
        let state = self.state.lock();
        LogCursor {
            session: state.session,
            len: state.log.len(),
        }
    }

    /// Copies `range` of the log, clamped to the cursor's length.
    ///
    /// Fails if the log was reset after the cursor was taken; the events the
    /// cursor referred to no longer exist.
    pub fn read_log(
        &self,
        cursor: &LogCursor,
        range: Range<usize>,
    ) -> Result<Vec<PacketEvent>, StateError> {
        let state = self.state.lock();
        if state.session != cursor.session {
            return Err(StateError::SessionChanged);
        }
        let end = range.end.min(cursor.len);
        let start = range.start.min(end);
        Ok(state.log[start..end].to_vec())
    }

    pub fn log_len(&self) -> usize {
        self.state.lock().log.len()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::thread;

    use chrono::Local;
    use proptest::prelude::*;

    use super::*;
    use crate::events::Protocol;

    fn packet(protocol: Protocol, size: u32) -> PacketEvent {
        PacketEvent::new(Local::now(), protocol, "192.168.1.10", "172.217.16.1 (Google)", size)
    }

    fn active_store(capacity: usize) -> AggregationStore {
        let store = AggregationStore::new(capacity);
        store.begin_session().unwrap();
        store
    }

    #[test]
    fn ingest_before_start_is_rejected() {
        let store = AggregationStore::new(60);
        assert_eq!(
            store.ingest(packet(Protocol::Tcp, 64)),
            Err(StateError::NotActive("ingest"))
        );
        assert_eq!(store.log_len(), 0);
    }

    #[test]
    fn three_event_scenario() {
        let store = active_store(60);
        store.ingest(packet(Protocol::Tcp, 100)).unwrap();
        store.ingest(packet(Protocol::Https, 200)).unwrap();
        store.ingest(packet(Protocol::Udp, 300)).unwrap();

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.total_packets, 3);
        assert_eq!(snapshot.total_bytes, 600);
        assert_eq!(snapshot.counters.get(Protocol::Tcp), 1);
        assert_eq!(snapshot.counters.get(Protocol::Https), 1);
        assert_eq!(snapshot.counters.get(Protocol::Udp), 1);
        assert_eq!(snapshot.counters.get(Protocol::Icmp), 0);
        assert_eq!(snapshot.last_event.map(|e| e.protocol), Some(Protocol::Udp));
    }

    #[test]
    fn rotation_moves_tally_into_window() {
        let store = active_store(4);
        store.ingest(packet(Protocol::Tcp, 64)).unwrap();
        store.ingest(packet(Protocol::Tcp, 64)).unwrap();
        assert_eq!(store.rotate_window(), Ok(2));
        // no ingestion in between: a zero is appended
        assert_eq!(store.rotate_window(), Ok(0));

        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.window.to_vec(), vec![0, 0, 2, 0]);
        assert_eq!(snapshot.sequence, 2);
    }

    #[test]
    fn reset_requires_idle() {
        let store = active_store(8);
        assert_eq!(store.reset(), Err(StateError::Active("reset")));
        store.end_session().unwrap();
        assert_eq!(store.end_session(), Err(StateError::NotActive("end_session")));
    }

    #[test]
    fn stop_then_reset_clears_everything() {
        let store = active_store(60);
        for _ in 0..5 {
            store.ingest(packet(Protocol::Icmp, 64)).unwrap();
        }
        store.rotate_window().unwrap();
        store.end_session().unwrap();
        store.reset().unwrap();

        assert_eq!(store.log_len(), 0);
        store.begin_session().unwrap();
        let snapshot = store.snapshot().unwrap();
        assert_eq!(snapshot.total_packets, 0);
        assert!(snapshot.counters.iter().all(|(_, count)| count == 0));
        assert_eq!(snapshot.window.len(), 60);
        assert!(snapshot.window.iter().all(|s| s == 0));
        assert!(snapshot.last_event.is_none());
    }

    #[test]
    fn snapshot_and_rotation_are_rejected_while_idle() {
        let store = AggregationStore::new(8);
        assert!(store.snapshot().is_err());
        assert!(store.rotate_window().is_err());
    }

    #[test]
    fn cursor_reads_a_stable_prefix() {
        let store = active_store(8);
        for size in [10, 20, 30] {
            store.ingest(packet(Protocol::Tcp, size)).unwrap();
        }
        let cursor = store.log_cursor();
        store.ingest(packet(Protocol::Udp, 40)).unwrap();

        let events = store.read_log(&cursor, 0..usize::MAX).unwrap();
        assert_eq!(events.iter().map(|e| e.size).collect::<Vec<_>>(), vec![10, 20, 30]);
        assert_eq!(store.read_log(&cursor, 2..10).unwrap().len(), 1);
        assert!(store.read_log(&cursor, 5..10).unwrap().is_empty());
    }

    #[test]
    fn cursor_is_invalidated_by_reset() {
        let store = active_store(8);
        store.ingest(packet(Protocol::Tcp, 10)).unwrap();
        let cursor = store.log_cursor();
        store.end_session().unwrap();
        store.reset().unwrap();
        assert_eq!(
            store.read_log(&cursor, 0..1),
            Err(StateError::SessionChanged)
        );
    }

    #[test]
    fn concurrent_readers_never_see_torn_counters() {
        let store = Arc::new(active_store(16));
        let producers: Vec<_> = (0..4)
            .map(|i| {
                let store = store.clone();
                thread::spawn(move || {
                    for n in 0..2_000u32 {
                        let protocol = Protocol::ALL[((n as usize) + i) % Protocol::COUNT];
                        store.ingest(packet(protocol, 64)).unwrap();
                    }
                })
            })
            .collect();

        let reader = {
            let store = store.clone();
            thread::spawn(move || {
                let mut last_total = 0;
                for _ in 0..2_000 {
                    store.rotate_window().unwrap();
                    let snapshot = store.snapshot().unwrap();
                    assert_eq!(snapshot.counters.total(), snapshot.total_packets);
                    assert_eq!(snapshot.window.len(), 16);
                    assert!(snapshot.total_packets >= last_total);
                    last_total = snapshot.total_packets;
                }
            })
        };

        for handle in producers {
            handle.join().unwrap();
        }
        reader.join().unwrap();
        assert_eq!(store.snapshot().unwrap().total_packets, 8_000);
        assert_eq!(store.log_len(), 8_000);
    }

    fn arb_protocol() -> impl Strategy<Value = Protocol> {
        prop::sample::select(Protocol::ALL.to_vec())
    }

    #[derive(Debug, Clone)]
    enum Op {
        Ingest(Protocol),
        Rotate,
    }

    fn arb_op() -> impl Strategy<Value = Op> {
        prop_oneof![
            3 => arb_protocol().prop_map(Op::Ingest),
            1 => Just(Op::Rotate),
        ]
    }

    proptest! {
        #[test]
        fn counters_always_sum_to_ingested(ops in prop::collection::vec(arb_op(), 0..300)) {
            let store = active_store(8);
            let mut ingested = 0u64;
            for op in ops {
                match op {
                    Op::Ingest(protocol) => {
                        store.ingest(packet(protocol, 64)).unwrap();
                        ingested += 1;
                    }
                    Op::Rotate => {
                        store.rotate_window().unwrap();
                    }
                }
                let snapshot = store.snapshot().unwrap();
                prop_assert_eq!(snapshot.counters.total(), ingested);
                prop_assert_eq!(snapshot.total_packets, ingested);
            }
        }

        #[test]
        fn window_length_is_fixed(capacity in 1usize..100, rotations in 0usize..300, per_tick in 0u32..5) {
            let store = active_store(capacity);
            for _ in 0..rotations {
                for _ in 0..per_tick {
                    store.ingest(packet(Protocol::Udp, 64)).unwrap();
                }
                store.rotate_window().unwrap();
                prop_assert_eq!(store.snapshot().unwrap().window.len(), capacity);
            }
            let window = store.snapshot().unwrap().window;
            // samples inside the filled part all equal per_tick
            let filled = rotations.min(capacity);
            prop_assert!(window.iter().skip(capacity - filled).all(|s| s == u64::from(per_tick)));
        }
    }
}
