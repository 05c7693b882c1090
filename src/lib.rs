//! # Prometheus Tasks Runner
//!
//! A bounded-concurrency task runner: admits units of asynchronous work into a
//! fixed number of execution slots, holds producers back while every slot is
//! occupied, and offers a barrier that waits until all slots have drained.
//!
//! ## Core Problem Solved
//!
//! Producers that start work faster than it finishes (batch imports, fan-out
//! requests, file processing) need a hard ceiling on in-flight work without
//! building a queue. The runner does not queue anything: a producer calling
//! [`TasksRunner::run_task`](core::TasksRunner::run_task) simply does not get
//! control back until a slot is available.
//!
//! ## Key Features
//!
//! - **Slot admission**: lowest free index wins; finished occupants are
//!   released and replaced
//! - **Backpressure**: a submit returns only once a slot is free again, so
//!   back-to-back producers never race past capacity
//! - **Drain barrier**: [`wait_all`](core::TasksRunner::wait_all) blocks until
//!   every slot is finished
//! - **Cooperative cancellation**: any [`CancelSignal`](core::CancelSignal),
//!   including `tokio_util::sync::CancellationToken`, aborts the runner's own
//!   waits without touching running work
//! - **Rate-limited diagnostics**: "all slots occupied" is reported on the
//!   first scan and every K-th scan after
//!
//! ```rust,ignore
//! use prometheus_tasks_runner::builders::TasksRunnerBuilder;
//! use prometheus_tasks_runner::core::{Admission, Drain};
//! use tokio_util::sync::CancellationToken;
//!
//! let runner = TasksRunnerBuilder::new()
//!     .with_parallelism(4)
//!     .with_poll_interval(Duration::from_millis(50))
//!     .build()?;
//! let cancel = CancellationToken::new();
//!
//! for file in files {
//!     let handle = tokio::spawn(process(file));
//!     if runner.run_task(handle, &cancel).await == Admission::Cancelled {
//!         break;
//!     }
//! }
//! assert_eq!(runner.wait_all(&cancel).await, Drain::Drained);
//! ```
//!
//! For complete scenarios, see `tests/tasks_runner_test.rs`.

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]

/// Core admission control, work seams and diagnostics.
pub mod core;
/// Configuration models for the runner.
pub mod config;
/// Builders to construct runners from configuration.
pub mod builders;
/// Runtime adapters.
pub mod runtime;
/// Shared utilities.
pub mod util;
