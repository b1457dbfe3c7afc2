//! # sentinel-core
//!
//! Foundation layer of the traffic telemetry engine: the packet event model,
//! the aggregation store that owns all shared session state, snapshot types
//! and the threat classifier.
//!
//! ### Key Submodules:
//! - `events`: immutable packet events and the protocol label set
//! - `store`: lock-guarded counters, event log and rolling window
//! - `threat`: placeholder classification heuristic behind a trait
//! - `time`: clock abstraction for event timestamps

pub mod error;
pub mod events;
pub mod snapshot;
pub mod store;
pub mod threat;
pub mod time;

pub mod prelude {
    pub use crate::error::*;
    pub use crate::events::*;
    pub use crate::snapshot::*;
    pub use crate::store::{AggregationStore, LogCursor, ProtocolCounters, TrafficWindow};
    pub use crate::threat::*;
    pub use crate::time::*;
}

pub use error::StateError;
