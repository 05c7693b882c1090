//! Runner configuration structures.

use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::core::RunnerError;

/// Default number of scan attempts between "no slot available" diagnostics.
pub const DEFAULT_NO_AVAILABLE_SLOT_LOG_INTERVAL: u32 = 1000;

/// Default polling interval in milliseconds.
pub const DEFAULT_POLL_INTERVAL_MS: u64 = 100;

/// Environment variable holding the slot count.
pub const ENV_ALLOWED_PARALLEL_TASKS: &str = "TASKS_RUNNER_ALLOWED_PARALLEL_TASKS";
/// Environment variable holding the polling interval in milliseconds.
pub const ENV_POLL_INTERVAL_MS: &str = "TASKS_RUNNER_POLL_INTERVAL_MS";
/// Environment variable holding the diagnostic log cadence.
pub const ENV_LOG_INTERVAL: &str = "TASKS_RUNNER_LOG_INTERVAL";
/// Environment variable toggling the trailing backpressure wait.
pub const ENV_BACKPRESSURE: &str = "TASKS_RUNNER_BACKPRESSURE";

const fn default_backpressure() -> bool {
    true
}

/// Whole milliseconds on the wire; a non-zero interval never serializes as 0.
mod duration_ms {
    use std::time::Duration;

    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(interval: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
        let mut millis = u64::try_from(interval.as_millis()).unwrap_or(u64::MAX);
        if millis == 0 && !interval.is_zero() {
            millis = 1;
        }
        serializer.serialize_u64(millis)
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
        u64::deserialize(deserializer).map(Duration::from_millis)
    }
}

/// Runner configuration. Immutable once handed to the runner.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TasksRunnerConfig {
    /// Number of execution slots. Zero is coerced to one.
    pub allowed_parallel_tasks: u16,
    /// Delay between slot availability checks. Must be non-zero.
    /// Serialized as `poll_interval_ms`.
    #[serde(rename = "poll_interval_ms", with = "duration_ms")]
    pub poll_interval: Duration,
    /// Scan attempts between repeated "all slots occupied" diagnostics.
    #[serde(default)]
    pub no_available_slot_log_interval: Option<u32>,
    /// Whether `run_task` waits for one more free slot after installing work.
    #[serde(default = "default_backpressure")]
    pub backpressure: bool,
}

impl Default for TasksRunnerConfig {
    fn default() -> Self {
        Self {
            allowed_parallel_tasks: u16::try_from(num_cpus::get()).unwrap_or(u16::MAX),
            poll_interval: Duration::from_millis(DEFAULT_POLL_INTERVAL_MS),
            no_available_slot_log_interval: None,
            backpressure: true,
        }
    }
}

impl TasksRunnerConfig {
    /// Create a configuration with explicit slot count and polling interval.
    #[must_use]
    pub const fn new(allowed_parallel_tasks: u16, poll_interval: Duration) -> Self {
        Self {
            allowed_parallel_tasks,
            poll_interval,
            no_available_slot_log_interval: None,
            backpressure: true,
        }
    }

    /// Set the diagnostic log cadence.
    #[must_use]
    pub const fn with_log_interval(mut self, interval: u32) -> Self {
        self.no_available_slot_log_interval = Some(interval);
        self
    }

    /// Enable or disable the trailing backpressure wait.
    #[must_use]
    pub const fn with_backpressure(mut self, enabled: bool) -> Self {
        self.backpressure = enabled;
        self
    }

    /// Polling interval between availability checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Slot count after coercing zero to one.
    #[must_use]
    pub fn effective_parallelism(&self) -> usize {
        usize::from(self.allowed_parallel_tasks.max(1))
    }

    /// Log cadence after applying the default and coercing zero to one.
    #[must_use]
    pub fn effective_log_interval(&self) -> u32 {
        self.no_available_slot_log_interval
            .unwrap_or(DEFAULT_NO_AVAILABLE_SLOT_LOG_INTERVAL)
            .max(1)
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), String> {
        if self.poll_interval.is_zero() {
            return Err("poll_interval cannot be zero".into());
        }
        Ok(())
    }

    /// Parse runner configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// [`RunnerError::Config`] for malformed JSON, [`RunnerError::InvalidConfig`]
    /// for values rejected by [`validate`](Self::validate).
    pub fn from_json_str(input: &str) -> Result<Self, RunnerError> {
        let cfg: Self = serde_json::from_str(input)
            .map_err(|e| RunnerError::Config(format!("parse error: {e}")))?;
        cfg.validate().map_err(RunnerError::InvalidConfig)?;
        Ok(cfg)
    }

    /// Load configuration from the process environment, reading a `.env`
    /// file first if one is present. Unset variables keep their defaults.
    ///
    /// # Errors
    ///
    /// Same as [`from_lookup`](Self::from_lookup).
    pub fn from_env() -> Result<Self, RunnerError> {
        if let Ok(path) = dotenvy::dotenv() {
            tracing::debug!("loaded environment from {}", path.display());
        }
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup and validate.
    ///
    /// # Errors
    ///
    /// [`RunnerError::Config`] for values that do not parse,
    /// [`RunnerError::InvalidConfig`] for values rejected by
    /// [`validate`](Self::validate).
    pub fn from_lookup<F>(lookup: F) -> Result<Self, RunnerError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut cfg = Self::default();
        if let Some(raw) = lookup(ENV_ALLOWED_PARALLEL_TASKS) {
            cfg.allowed_parallel_tasks = parse_var(ENV_ALLOWED_PARALLEL_TASKS, &raw)?;
        }
        if let Some(raw) = lookup(ENV_POLL_INTERVAL_MS) {
            cfg.poll_interval = Duration::from_millis(parse_var(ENV_POLL_INTERVAL_MS, &raw)?);
        }
        if let Some(raw) = lookup(ENV_LOG_INTERVAL) {
            cfg.no_available_slot_log_interval = Some(parse_var(ENV_LOG_INTERVAL, &raw)?);
        }
        if let Some(raw) = lookup(ENV_BACKPRESSURE) {
            cfg.backpressure = parse_var(ENV_BACKPRESSURE, &raw)?;
        }
        cfg.validate().map_err(RunnerError::InvalidConfig)?;
        Ok(cfg)
    }
}

fn parse_var<T>(key: &str, raw: &str) -> Result<T, RunnerError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse()
        .map_err(|e| RunnerError::Config(format!("`{key}` invalid value `{raw}`: {e}")))
}
