//! Error types for runner operations.

use thiserror::Error;

/// Errors produced while constructing or configuring a runner.
///
/// Cancellation is not an error; it is reported through
/// [`Admission::Cancelled`](crate::core::Admission) and
/// [`Drain::Cancelled`](crate::core::Drain).
#[derive(Debug, Error)]
pub enum RunnerError {
    /// Construction parameters were rejected.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    /// Configuration could not be parsed or loaded.
    #[error("config error: {0}")]
    Config(String),
}

/// Application-facing result using anyhow for higher-level contexts.
pub type AppResult<T> = Result<T, anyhow::Error>;
