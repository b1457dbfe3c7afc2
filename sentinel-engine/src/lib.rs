//! # sentinel-engine
//!
//! Runs the traffic telemetry engine: a randomized producer and a
//! fixed-cadence snapshot publisher sharing one aggregation store, plus the
//! start/stop/reset/export control surface used by front ends.

pub mod engine;

pub use engine::{
    ChannelSink, EngineError, EngineState, Exporter, FeedSink, FeedUpdate, NullSink,
    StopReport, TrafficEngine,
};
