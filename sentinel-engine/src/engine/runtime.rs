//! Engine runtime - owns the aggregation store and coordinates the producer
//! and publisher timelines.
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, instrument, warn};

use sentinel_config::SentinelConfig;
use sentinel_core::events::PacketEvent;
use sentinel_core::store::AggregationStore;
use sentinel_core::threat::{HeuristicClassifier, ThreatClassifier};
use sentinel_core::time::{Clock, SystemClock};
use sentinel_core::StateError;
use sentinel_simulator::{run_producer, ProducerReport, TrafficGenerator};
use sentinel_telemetry::MetricsRecorder;

use super::error::EngineError;
use super::export::Exporter;
use super::publisher::{PublisherReport, SnapshotPublisher};
use super::sink::FeedSink;

/// Engine-wide lifecycle state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    Idle,
    Active,
}

/// What the two background timelines did during a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StopReport {
    pub producer: ProducerReport,
    pub publisher: PublisherReport,
}

type Joined = (
    Result<ProducerReport, JoinError>,
    Result<PublisherReport, JoinError>,
);

struct Session {
    stop: watch::Sender<bool>,
    /// Resolves once both timelines have exited.
    timelines: JoinHandle<Joined>,
}

/// Control surface of the traffic telemetry engine.
///
/// `IDLE → ACTIVE → IDLE` via [`start`](Self::start) / [`stop`](Self::stop).
/// [`reset`](Self::reset) is only legal while idle; [`export`](Self::export)
/// works in either state.
pub struct TrafficEngine {
    config: SentinelConfig,
    store: Arc<AggregationStore>,
    sink: Arc<dyn FeedSink>,
    classifier: Arc<dyn ThreatClassifier>,
    clock: Arc<dyn Clock>,
    metrics: Option<Arc<MetricsRecorder>>,
    session: Option<Session>,
}

impl TrafficEngine {
    /// Builds an idle engine. The configuration is validated on `start`.
    pub fn new(config: SentinelConfig, sink: Arc<dyn FeedSink>) -> Self {
        let store = Arc::new(AggregationStore::new(config.aggregation.window_capacity));
        Self {
            config,
            store,
            sink,
            classifier: Arc::new(HeuristicClassifier),
            clock: Arc::new(SystemClock),
            metrics: None,
            session: None,
        }
    }

    pub fn with_classifier(mut self, classifier: Arc<dyn ThreatClassifier>) -> Self {
        self.classifier = classifier;
        self
    }

    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    pub fn with_metrics(mut self, metrics: Arc<MetricsRecorder>) -> Self {
        self.metrics = Some(metrics);
        self
    }

    pub fn state(&self) -> EngineState {
        if self.session.is_some() {
            EngineState::Active
        } else {
            EngineState::Idle
        }
    }

    pub fn config(&self) -> &SentinelConfig {
        &self.config
    }

    pub fn store(&self) -> &Arc<AggregationStore> {
        &self.store
    }

    /// Starts a fresh session: validates the configuration, clears the store
    /// and spawns the producer and publisher on the current Tokio runtime.
    ///
    /// A configuration error aborts this attempt only; the engine stays idle.
    #[instrument(skip(self))]
    pub fn start(&mut self) -> Result<(), EngineError> {
        if self.session.is_some() {
            return Err(StateError::Active("start").into());
        }
        self.config.check()?;
        let generator = TrafficGenerator::from_config(&self.config.generator)?;
        let runtime = Handle::try_current()?;

        self.store.begin_session()?;
        let (stop, stop_rx) = watch::channel(false);

        let on_event = {
            let sink = self.sink.clone();
            let metrics = self.metrics.clone();
            move |event: &PacketEvent| {
                if let Some(metrics) = &metrics {
                    metrics.record_packet(event.size);
                }
                sink.on_log_line(event.to_string());
            }
        };
        let producer = runtime.spawn(run_producer(
            generator,
            self.store.clone(),
            self.clock.clone(),
            on_event,
            stop_rx.clone(),
        ));

        let publisher = SnapshotPublisher::new(
            self.store.clone(),
            self.classifier.clone(),
            self.sink.clone(),
            self.config.publisher.cadence(),
        )
        .with_metrics(self.metrics.clone());
        let publisher = runtime.spawn(publisher.run(stop_rx));
        let timelines = runtime.spawn(async move { (producer.await, publisher.await) });

        self.session = Some(Session { stop, timelines });
        info!(
            window = self.store.window_capacity(),
            cadence_ms = self.config.publisher.cadence_ms,
            "Traffic engine started"
        );
        Ok(())
    }

    /// Signals both timelines, waits until they have quiesced, then marks
    /// the store idle. No snapshot is delivered after this returns.
    ///
    /// Cancel safe: if the returned future is dropped early the engine stays
    /// `Active` and a later `stop` finishes the shutdown.
    #[instrument(skip(self))]
    pub async fn stop(&mut self) -> Result<StopReport, EngineError> {
        let session = self
            .session
            .as_mut()
            .ok_or(StateError::NotActive("stop"))?;

        session.stop.send_replace(true);
        let joined = (&mut session.timelines).await;

        // no await past this point: session and store go idle together
        self.session = None;
        self.store.end_session()?;

        let (producer, publisher) = joined?;

        let report = StopReport {
            producer: producer?,
            publisher: publisher?,
        };
        info!(
            ingested = report.producer.ingested,
            published = report.publisher.published,
            "Traffic engine stopped"
        );
        Ok(report)
    }

    /// Clears counters, log and window. Only legal while idle.
    pub fn reset(&mut self) -> Result<(), EngineError> {
        if self.session.is_some() {
            return Err(StateError::Active("reset").into());
        }
        self.store.reset()?;
        debug!("Traffic engine reset");
        Ok(())
    }

    /// Feeds an externally produced event into the active session.
    pub fn ingest(&self, event: PacketEvent) -> Result<u64, EngineError> {
        let total = self.store.ingest(event.clone())?;
        if let Some(metrics) = &self.metrics {
            metrics.record_packet(event.size);
        }
        self.sink.on_log_line(event.to_string());
        Ok(total)
    }

    /// Writes the event log to `path`. Legal in either state; ingestion is
    /// never paused. Returns the number of rows written.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn export(&self, path: &Path) -> Result<usize, EngineError> {
        let rows = Exporter::new(self.store.clone()).export(path)?;
        if let Some(metrics) = &self.metrics {
            metrics.record_export();
        }
        Ok(rows)
    }

    /// Exports to `<export.directory>/LOG_<HHMMSS>.<export.extension>`.
    pub fn export_default(&self) -> Result<(PathBuf, usize), EngineError> {
        let name = Exporter::default_file_name(self.clock.now(), &self.config.export.extension);
        let path = self.config.export.directory.join(name);
        let rows = self.export(&path)?;
        Ok((path, rows))
    }
}

impl Drop for TrafficEngine {
    fn drop(&mut self) {
        if let Some(session) = &self.session {
            warn!("Traffic engine dropped while active, signalling background tasks");
            session.stop.send_replace(true);
        }
    }
}
