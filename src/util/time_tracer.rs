//! Stopwatch guard for timing an operation.

use std::time::Duration;

use tokio::time::Instant;

/// Measures elapsed time from construction until [`TimeTracer::stop`] or drop.
///
/// Uses the tokio clock so measurements follow a paused test clock.
#[derive(Debug)]
pub struct TimeTracer {
    operation: Option<String>,
    started: Instant,
    stopped: Option<Duration>,
}

impl TimeTracer {
    /// Start timing. A named tracer logs its elapsed time when stopped.
    #[must_use]
    pub fn start(operation: Option<&str>) -> Self {
        Self {
            operation: operation.map(str::to_owned),
            started: Instant::now(),
            stopped: None,
        }
    }

    /// Elapsed time so far, or the frozen duration once stopped.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.stopped.unwrap_or_else(|| self.started.elapsed())
    }

    /// Freeze the measurement and return it. Later calls return the same value.
    pub fn stop(&mut self) -> Duration {
        if let Some(elapsed) = self.stopped {
            return elapsed;
        }
        let elapsed = self.started.elapsed();
        self.stopped = Some(elapsed);
        if let Some(operation) = &self.operation {
            tracing::debug!(operation = %operation, elapsed = ?elapsed, "operation finished");
        }
        elapsed
    }
}

impl Drop for TimeTracer {
    fn drop(&mut self) {
        self.stop();
    }
}
