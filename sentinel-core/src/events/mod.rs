//! ## sentinel-core::events
//! **Packet event model**
//!
//! Immutable packet events as produced by a traffic source and retained in
//! the session log.

pub mod packet;
pub mod protocol;

pub use packet::PacketEvent;
pub use protocol::Protocol;
