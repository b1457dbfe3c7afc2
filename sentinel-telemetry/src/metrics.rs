//! ## sentinel-telemetry::metrics
//! **Prometheus counters and histograms for the telemetry engine**

use prometheus::{Histogram, HistogramOpts, IntCounter, Registry};

#[derive(Debug, Clone)]
pub struct MetricsRecorder {
    pub registry: Registry,
    pub packets_ingested: IntCounter,
    pub snapshots_published: IntCounter,
    pub exports_written: IntCounter,
    pub packet_size: Histogram,
}

impl MetricsRecorder {
    pub fn new() -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let packets_ingested =
            IntCounter::new("sentinel_packets_ingested_total", "Total ingested packet events")?;
        let snapshots_published = IntCounter::new(
            "sentinel_snapshots_published_total",
            "Snapshots delivered to the consumer",
        )?;
        let exports_written =
            IntCounter::new("sentinel_exports_total", "Event log exports written")?;
        let packet_size = Histogram::with_opts(
            HistogramOpts::new("sentinel_packet_size_bytes", "Generated packet sizes")
                .buckets(vec![64.0, 128.0, 256.0, 512.0, 1024.0, 1500.0]),
        )?;

        registry.register(Box::new(packets_ingested.clone()))?;
        registry.register(Box::new(snapshots_published.clone()))?;
        registry.register(Box::new(exports_written.clone()))?;
        registry.register(Box::new(packet_size.clone()))?;

        Ok(Self {
            registry,
            packets_ingested,
            snapshots_published,
            exports_written,
            packet_size,
        })
    }

    /// Text exposition of every registered metric.
    pub fn gather_metrics(&self) -> Result<String, prometheus::Error> {
        use prometheus::Encoder;
        let encoder = prometheus::TextEncoder::new();
        let mut buffer = Vec::<u8>::new();
        encoder.encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn record_packet(&self, size: u32) {
        self.packets_ingested.inc();
        self.packet_size.observe(f64::from(size));
    }

    pub fn record_snapshot(&self) {
        self.snapshots_published.inc();
    }

    pub fn record_export(&self) {
        self.exports_written.inc();
    }
}
