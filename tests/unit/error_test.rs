//! Tests for error types

use prometheus_tasks_runner::core::RunnerError;

#[test]
fn test_invalid_config_error() {
    let err = RunnerError::InvalidConfig("poll_interval cannot be zero".to_string());
    assert_eq!(
        format!("{}", err),
        "invalid configuration: poll_interval cannot be zero"
    );
}

#[test]
fn test_config_error() {
    let err = RunnerError::Config("missing file".to_string());
    assert_eq!(format!("{}", err), "config error: missing file");
}

#[test]
fn test_runner_error_into_anyhow() {
    fn build() -> prometheus_tasks_runner::core::AppResult<()> {
        Err(RunnerError::Config("boom".into()).into())
    }
    assert_eq!(build().unwrap_err().to_string(), "config error: boom");
}
