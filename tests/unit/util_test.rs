//! Tests for utility functions

use std::time::Duration;

use prometheus_tasks_runner::util::{init_tracing, TimeTracer};

#[test]
fn test_init_tracing_is_idempotent() {
    init_tracing();
    init_tracing();
}

#[tokio::test(start_paused = true)]
async fn test_time_tracer_measures_sleep() {
    let tracer = TimeTracer::start(Some("unit"));
    tokio::time::sleep(Duration::from_millis(1500)).await;
    let elapsed = tracer.elapsed();
    assert!(elapsed >= Duration::from_millis(1500));
    assert!(elapsed < Duration::from_secs(2));
}
