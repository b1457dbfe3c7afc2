use thiserror::Error;

use sentinel_config::ConfigError;
use sentinel_core::StateError;

/// Errors surfaced by the engine's control surface.
///
/// None of them leave the aggregation store in a partially updated state.
#[derive(Debug, Error)]
pub enum EngineError {
    /// Invalid configuration; fatal to the start attempt only.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Illegal state transition, e.g. `reset` while active.
    #[error(transparent)]
    State(#[from] StateError),

    /// Export target could not be written.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// `start` was called outside a Tokio runtime.
    #[error("no Tokio runtime available: {0}")]
    Runtime(#[from] tokio::runtime::TryCurrentError),

    /// A background task panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<csv::Error> for EngineError {
    fn from(err: csv::Error) -> Self {
        EngineError::Io(err.into())
    }
}
