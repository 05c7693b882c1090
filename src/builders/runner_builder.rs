//! Fluent construction of a [`TasksRunner`].

use std::time::Duration;

use crate::config::TasksRunnerConfig;
use crate::core::{DiagnosticSink, RunnerError, TasksRunner};

/// Builder for [`TasksRunner`].
///
/// ```rust,ignore
/// let runner = TasksRunnerBuilder::new()
///     .with_parallelism(8)
///     .with_poll_interval(Duration::from_millis(20))
///     .build()?;
/// ```
pub struct TasksRunnerBuilder {
    config: TasksRunnerConfig,
    diagnostics: Option<Box<dyn DiagnosticSink>>,
}

impl Default for TasksRunnerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl TasksRunnerBuilder {
    /// Start from the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(TasksRunnerConfig::default())
    }

    /// Start from an existing configuration.
    #[must_use]
    pub fn from_config(config: TasksRunnerConfig) -> Self {
        Self {
            config,
            diagnostics: None,
        }
    }

    /// Number of slots. Zero is coerced to one at build time.
    #[must_use]
    pub fn with_parallelism(mut self, slots: u16) -> Self {
        self.config.allowed_parallel_tasks = slots;
        self
    }

    /// Delay between availability checks.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.config.poll_interval = interval;
        self
    }

    /// Scan attempts between repeated "all slots occupied" diagnostics.
    #[must_use]
    pub fn with_log_interval(mut self, interval: u32) -> Self {
        self.config.no_available_slot_log_interval = Some(interval);
        self
    }

    /// Enable or disable the trailing backpressure wait.
    #[must_use]
    pub fn with_backpressure(mut self, enabled: bool) -> Self {
        self.config.backpressure = enabled;
        self
    }

    /// Attach a diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(sink);
        self
    }

    /// Configuration accumulated so far.
    #[must_use]
    pub const fn config(&self) -> &TasksRunnerConfig {
        &self.config
    }

    /// Validate and build the runner.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidConfig`] if the polling interval is zero.
    pub fn build(self) -> Result<TasksRunner, RunnerError> {
        let runner = TasksRunner::new(self.config)?;
        Ok(match self.diagnostics {
            Some(sink) => runner.with_diagnostics(sink),
            None => runner,
        })
    }
}
