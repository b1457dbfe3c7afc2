//! Fixed-cadence snapshot publisher.
//!
//! Each tick rotates the traffic window, copies the store, classifies the
//! copy and hands the sealed [`Snapshot`] to the sink.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, info, instrument};

use sentinel_core::error::StateError;
use sentinel_core::snapshot::Snapshot;
use sentinel_core::store::AggregationStore;
use sentinel_core::threat::{ThreatClassifier, ThreatInput, ThreatLabel};
use sentinel_telemetry::MetricsRecorder;

use super::sink::FeedSink;

/// Summary returned when the publisher loop exits.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PublisherReport {
    pub published: u64,
    /// Ticks that fired after the session had already ended.
    pub skipped: u64,
}

pub struct SnapshotPublisher {
    store: Arc<AggregationStore>,
    classifier: Arc<dyn ThreatClassifier>,
    sink: Arc<dyn FeedSink>,
    metrics: Option<Arc<MetricsRecorder>>,
    cadence: Duration,
    previous: ThreatLabel,
    last_total: u64,
}

impl SnapshotPublisher {
    pub fn new(
        store: Arc<AggregationStore>,
        classifier: Arc<dyn ThreatClassifier>,
        sink: Arc<dyn FeedSink>,
        cadence: Duration,
    ) -> Self {
        Self {
            store,
            classifier,
            sink,
            metrics: None,
            cadence,
            previous: ThreatLabel::default(),
            last_total: 0,
        }
    }

    pub fn with_metrics(mut self, metrics: Option<Arc<MetricsRecorder>>) -> Self {
        self.metrics = metrics;
        self
    }

    /// Rotate → snapshot → classify. Does not deliver.
    pub fn tick(&mut self) -> Result<Snapshot, StateError> {
        self.store.rotate_window()?;
        let copy = self.store.snapshot()?;

        let threat = self.classifier.classify(ThreatInput {
            total: copy.total_packets,
            counters: &copy.counters,
            last_protocol: copy.last_event.as_ref().map(|e| e.protocol),
            previous: self.previous,
        });
        self.previous = threat;

        debug_assert!(copy.total_packets >= self.last_total);
        self.last_total = copy.total_packets;

        Ok(copy.with_threat(threat))
    }

    /// Ticks every `cadence` until `stop` becomes `true`.
    ///
    /// The first tick fires one full period after the call. Late ticks are
    /// delayed rather than burst, so each delivered snapshot corresponds to
    /// exactly one rotation.
    #[instrument(skip_all, name = "publisher")]
    pub async fn run(mut self, mut stop: watch::Receiver<bool>) -> PublisherReport {
        let mut ticker = interval_at(Instant::now() + self.cadence, self.cadence);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

        let mut report = PublisherReport {
            published: 0,
            skipped: 0,
        };
        info!(cadence_ms = self.cadence.as_millis() as u64, "Snapshot publisher started");

        loop {
            if *stop.borrow_and_update() {
                break;
            }
            tokio::select! {
                biased;
                changed = stop.changed() => {
                    if changed.is_err() {
                        break;
                    }
                    continue;
                }
                _ = ticker.tick() => {}
            }

            // a session that ended under a fired timer fails the tick below
            match self.tick() {
                Ok(snapshot) => {
                    debug!(
                        sequence = snapshot.sequence(),
                        total = snapshot.total_packets(),
                        rate = snapshot.packets_per_interval(),
                        threat = %snapshot.threat(),
                        "Publishing snapshot"
                    );
                    self.sink.on_snapshot(snapshot);
                    if let Some(metrics) = &self.metrics {
                        metrics.record_snapshot();
                    }
                    report.published += 1;
                }
                Err(e) => {
                    debug!("Skipping tick: {e}");
                    report.skipped += 1;
                    break;
                }
            }
        }

        info!(published = report.published, "Snapshot publisher stopped");
        report
    }
}
