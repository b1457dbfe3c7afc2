mod error;
mod export;
mod publisher;
mod runtime;
mod sink;

pub use self::{
    error::EngineError,
    export::{Exporter, EXPORT_HEADER},
    publisher::{PublisherReport, SnapshotPublisher},
    runtime::{EngineState, StopReport, TrafficEngine},
    sink::{ChannelSink, FeedSink, FeedUpdate, NullSink},
};

pub mod prelude {
    pub use super::{ChannelSink, EngineError, EngineState, FeedSink, FeedUpdate, TrafficEngine};
}
