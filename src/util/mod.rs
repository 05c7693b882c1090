//! Shared utilities.

pub mod telemetry;
pub mod time_tracer;

pub use telemetry::*;
pub use time_tracer::TimeTracer;
