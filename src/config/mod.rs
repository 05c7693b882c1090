//! Configuration models for the runner.

pub mod runner;

pub use runner::{TasksRunnerConfig, DEFAULT_NO_AVAILABLE_SLOT_LOG_INTERVAL, DEFAULT_POLL_INTERVAL_MS};
