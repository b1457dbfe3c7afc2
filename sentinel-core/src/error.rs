use thiserror::Error;

/// Illegal operation for the current engine/store state.
#[derive(Debug, Clone, Copy, Error, PartialEq, Eq)]
pub enum StateError {
    /// Operation requires an active session.
    #[error("operation `{0}` requires an active session")]
    NotActive(&'static str),

    /// Operation requires the engine to be idle.
    #[error("operation `{0}` is not allowed while a session is active")]
    Active(&'static str),

    /// The event log was reset while a reader still held a cursor into it.
    #[error("event log was reset during the read")]
    SessionChanged,
}
