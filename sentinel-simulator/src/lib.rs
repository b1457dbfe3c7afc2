/*!
# Sentinel Simulator

Synthetic traffic source for the Sentinel telemetry engine. There is no packet
capture here: events are drawn from configurable statistical parameters.

## Key Components:
- **TrafficSource:** trait for anything that yields delays and packet events.
- **TrafficGenerator:** seeded weighted-random implementation.
- **Producer loop:** cancelable sleep → generate → ingest → forward cycle.
*/

pub mod driver;
pub mod generator;
pub mod producer;

pub use driver::TrafficSource;
pub use generator::TrafficGenerator;
pub use producer::{run_producer, ProducerExit, ProducerReport};
