//! Tests for builder modules

use std::time::Duration;

use prometheus_tasks_runner::builders::TasksRunnerBuilder;
use prometheus_tasks_runner::config::TasksRunnerConfig;
use prometheus_tasks_runner::core::{InMemoryDiagnosticSink, RunnerError};

#[test]
fn test_runner_builder_overrides() {
    let builder = TasksRunnerBuilder::new()
        .with_parallelism(5)
        .with_poll_interval(Duration::from_millis(20))
        .with_log_interval(10)
        .with_backpressure(false);

    assert_eq!(builder.config().allowed_parallel_tasks, 5);
    assert_eq!(builder.config().poll_interval, Duration::from_millis(20));
    assert_eq!(builder.config().no_available_slot_log_interval, Some(10));
    assert!(!builder.config().backpressure);

    let runner = builder.build().expect("valid config");
    assert_eq!(runner.capacity(), 5);
    assert_eq!(runner.poll_interval(), Duration::from_millis(20));
}

#[test]
fn test_runner_builder_from_config() {
    let runner = TasksRunnerBuilder::from_config(TasksRunnerConfig::new(2, Duration::from_secs(1)))
        .with_diagnostics(Box::new(InMemoryDiagnosticSink::new(8)))
        .build()
        .expect("valid config");
    assert_eq!(runner.capacity(), 2);
}

#[test]
fn test_runner_builder_rejects_zero_interval() {
    let result = TasksRunnerBuilder::new()
        .with_poll_interval(Duration::ZERO)
        .build();
    assert!(matches!(result, Err(RunnerError::InvalidConfig(_))));
}
