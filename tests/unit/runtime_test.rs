//! Tests for tokio spawner utilities

use std::time::Duration;

use prometheus_tasks_runner::core::{Admission, Spawn, TasksRunner, Work};
use prometheus_tasks_runner::config::TasksRunnerConfig;
use prometheus_tasks_runner::runtime::tokio_spawner::TokioSpawner;
use tokio_util::sync::CancellationToken;

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_tokio_spawner_spawn() {
    let spawner = TokioSpawner::new(tokio::runtime::Handle::current());

    let (tx, rx) = tokio::sync::oneshot::channel();
    let handle = spawner.spawn(async move {
        tx.send(123).unwrap();
    });

    let result = rx.await.expect("oneshot result");
    assert_eq!(result, 123);
    handle.await.expect("spawned task");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_spawn_task_installs_handle() {
    let runner = TasksRunner::new(TasksRunnerConfig::new(2, Duration::from_millis(5)))
        .expect("valid config");
    let cancel = CancellationToken::new();
    let (tx, rx) = tokio::sync::oneshot::channel::<()>();

    let admission = runner
        .spawn_task(
            &TokioSpawner::current(),
            async move {
                let _ = rx.await;
            },
            &cancel,
        )
        .await;
    assert_eq!(admission, Admission::Admitted { slot: 0 });
    assert_eq!(runner.occupied_count(), 1);

    tx.send(()).expect("receiver alive");
    runner.wait_all(&cancel).await;
    assert_eq!(runner.occupied_count(), 0);
}

#[test]
fn test_owned_runtime_spawner() {
    let spawner = TokioSpawner::with_worker_threads(1).expect("runtime");
    let handle = spawner.spawn(async {});
    while !Work::is_finished(&handle) {
        std::thread::sleep(Duration::from_millis(1));
    }
}
