//! Tests for configuration validation

use std::time::Duration;

use prometheus_tasks_runner::config::runner::{ENV_ALLOWED_PARALLEL_TASKS, ENV_POLL_INTERVAL_MS};
use prometheus_tasks_runner::config::{TasksRunnerConfig, DEFAULT_POLL_INTERVAL_MS};
use prometheus_tasks_runner::core::RunnerError;

#[test]
fn test_runner_config_validation() {
    let valid = TasksRunnerConfig::new(4, Duration::from_millis(250));
    assert!(valid.validate().is_ok());
}

#[test]
fn test_runner_config_invalid_poll_interval() {
    let invalid = TasksRunnerConfig::new(4, Duration::ZERO);
    assert!(invalid.validate().is_err());
}

#[test]
fn test_runner_config_zero_slots_is_valid() {
    let config = TasksRunnerConfig::new(0, Duration::from_secs(1));
    assert!(config.validate().is_ok());
    assert_eq!(config.effective_parallelism(), 1);
}

#[test]
fn test_runner_config_default() {
    let config = TasksRunnerConfig::default();
    assert!(config.allowed_parallel_tasks >= 1);
    assert_eq!(
        config.poll_interval(),
        Duration::from_millis(DEFAULT_POLL_INTERVAL_MS)
    );
    assert!(config.backpressure);
}

#[test]
fn test_runner_config_from_json() {
    let json = r#"{
        "allowed_parallel_tasks": 3,
        "poll_interval_ms": 1000,
        "no_available_slot_log_interval": 50
    }"#;

    let config = TasksRunnerConfig::from_json_str(json).expect("valid json");
    assert_eq!(config.allowed_parallel_tasks, 3);
    assert_eq!(config.poll_interval(), Duration::from_secs(1));
    assert_eq!(config.effective_log_interval(), 50);
    assert!(config.backpressure);
}

#[test]
fn test_runner_config_from_json_rejects_zero_interval() {
    let json = r#"{ "allowed_parallel_tasks": 3, "poll_interval_ms": 0 }"#;
    let err = TasksRunnerConfig::from_json_str(json).unwrap_err();
    assert!(matches!(&err, RunnerError::InvalidConfig(msg) if msg.contains("poll_interval")));
}

#[test]
fn test_runner_config_from_json_parse_error() {
    let err = TasksRunnerConfig::from_json_str("{ not json").unwrap_err();
    assert!(matches!(&err, RunnerError::Config(msg) if msg.starts_with("parse error")));
}

#[test]
fn test_runner_config_sub_millisecond_interval() {
    let config = TasksRunnerConfig::new(2, Duration::from_micros(500));
    assert!(config.validate().is_ok());
    assert_eq!(config.poll_interval(), Duration::from_micros(500));
}

#[test]
fn test_runner_config_lookup_bad_value_is_config_error() {
    let err = TasksRunnerConfig::from_lookup(|key| match key {
        ENV_ALLOWED_PARALLEL_TASKS => Some("many".into()),
        _ => None,
    })
    .unwrap_err();
    assert!(matches!(&err, RunnerError::Config(msg) if msg.contains(ENV_ALLOWED_PARALLEL_TASKS)));
    assert!(err.to_string().starts_with("config error:"));
}

#[test]
fn test_runner_config_lookup_out_of_range_interval() {
    let err = TasksRunnerConfig::from_lookup(|key| {
        (key == ENV_POLL_INTERVAL_MS).then(|| "-5".to_string())
    })
    .unwrap_err();
    assert!(matches!(err, RunnerError::Config(_)));
}
