//! Cancelable producer loop: sleep, generate, ingest, forward.

use std::sync::Arc;

use tokio::sync::watch;
use tokio::time::sleep;
use tracing::{debug, info, instrument, warn};

use sentinel_core::events::PacketEvent;
use sentinel_core::store::AggregationStore;
use sentinel_core::time::Clock;

use crate::driver::TrafficSource;

/// Why the producer loop returned.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProducerExit {
    /// The stop signal was raised or its sender dropped.
    Stopped,
    /// The store refused an event because the session ended underneath us.
    StoreInactive,
}

/// Summary returned when the producer loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProducerReport {
    pub ingested: u64,
    pub exit: ProducerExit,
}

/// Runs until `stop` becomes `true`.
///
/// Each iteration sleeps for `source.next_delay()`, builds a packet stamped
/// by `clock`, ingests it and hands it to `on_event`. The stop signal is
/// raced against the sleep, so cancellation is observed within one
/// interval, and it is re-checked after waking so no event is ingested once
/// a stop was requested. Ingestion itself is a single store call, so a stop
/// can never leave an event half-applied.
#[instrument(skip_all, name = "producer")]
pub async fn run_producer<S, C, F>(
    mut source: S,
    store: Arc<AggregationStore>,
    clock: C,
    mut on_event: F,
    mut stop: watch::Receiver<bool>,
) -> ProducerReport
where
    S: TrafficSource,
    C: Clock,
    F: FnMut(&PacketEvent) + Send,
{
    info!("Traffic producer started");
    let mut ingested = 0u64;

    let exit = loop {
        if *stop.borrow_and_update() {
            break ProducerExit::Stopped;
        }

        let delay = source.next_delay();
        tokio::select! {
            biased;
            changed = stop.changed() => {
                if changed.is_err() {
                    break ProducerExit::Stopped;
                }
                // value re-checked at the top of the loop
                continue;
            }
            _ = sleep(delay) => {}
        }

        if *stop.borrow() {
            break ProducerExit::Stopped;
        }

        let event = source.next_packet(clock.now());
        match store.ingest(event.clone()) {
            Ok(total) => {
                ingested += 1;
                debug!(total, protocol = %event.protocol, size = event.size, "Packet generated");
                on_event(&event);
            }
            Err(e) => {
                warn!("Producer halted, event not ingested: {e}");
                break ProducerExit::StoreInactive;
            }
        }
    };

    info!(ingested, ?exit, "Traffic producer stopped");
    ProducerReport { ingested, exit }
}
