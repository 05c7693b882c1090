//! Bounded task runner: slot admission with polling and a drain barrier.
//!
//! The runner owns a fixed registry of slots, each holding at most one
//! in-flight unit of [`Work`]. Completion is detected lazily: a slot whose
//! occupant reports [`Work::is_finished`] is free for reuse on the next scan.
//!
//! Scan-and-claim runs under one `parking_lot::Mutex`, so two concurrent
//! submitters can never claim the same slot. The polling sleep happens
//! outside the lock, and the guard is never held across an `.await`.
//!
//! ```rust,ignore
//! use prometheus_tasks_runner::config::TasksRunnerConfig;
//! use prometheus_tasks_runner::core::TasksRunner;
//! use tokio_util::sync::CancellationToken;
//!
//! let runner = TasksRunner::new(TasksRunnerConfig::new(4, Duration::from_millis(50)))?;
//! let cancel = CancellationToken::new();
//!
//! for job in jobs {
//!     runner.run_task(tokio::spawn(job), &cancel).await;
//! }
//! runner.wait_all(&cancel).await;
//! ```

use std::future::Future;
use std::time::Duration;

use parking_lot::Mutex;
use uuid::Uuid;

use crate::config::TasksRunnerConfig;
use crate::core::diagnostics::{DiagnosticSink, RunnerEvent};
use crate::core::work::{CancelSignal, Spawn, Work};
use crate::core::RunnerError;
use crate::util::TimeTracer;

type Slot = Option<Box<dyn Work>>;

/// Outcome of submitting work.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The work was installed in the given slot.
    Admitted {
        /// Slot index that received the work.
        slot: usize,
    },
    /// Cancellation was observed before a slot could be claimed.
    /// The work was not installed.
    Cancelled,
}

impl Admission {
    /// Returns `true` if the work was installed.
    #[must_use]
    pub const fn is_admitted(&self) -> bool {
        matches!(self, Self::Admitted { .. })
    }
}

/// Outcome of waiting for every slot to drain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Drain {
    /// Every slot was empty or finished.
    Drained,
    /// Cancellation was observed; later slots were left unchecked.
    Cancelled,
}

/// Point-in-time view of a slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotState {
    /// Never used.
    Empty,
    /// Holds work that had not finished when checked.
    Running,
    /// Holds finished work, eligible for reuse.
    Finished,
}

/// Runner with a hard upper bound on concurrently installed work.
pub struct TasksRunner {
    id: Uuid,
    slots: Mutex<Vec<Slot>>,
    poll_interval: Duration,
    log_interval: u32,
    backpressure: bool,
    diagnostics: Option<Mutex<Box<dyn DiagnosticSink>>>,
}

impl std::fmt::Debug for TasksRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TasksRunner")
            .field("id", &self.id)
            .field("capacity", &self.capacity())
            .field("poll_interval", &self.poll_interval)
            .field("log_interval", &self.log_interval)
            .field("backpressure", &self.backpressure)
            .finish_non_exhaustive()
    }
}

impl TasksRunner {
    /// Create a runner from configuration.
    ///
    /// # Errors
    ///
    /// Returns [`RunnerError::InvalidConfig`] if the polling interval is zero.
    pub fn new(config: TasksRunnerConfig) -> Result<Self, RunnerError> {
        config.validate().map_err(RunnerError::InvalidConfig)?;
        if config.allowed_parallel_tasks == 0 {
            tracing::warn!("allowed_parallel_tasks is zero, using a single slot");
        }

        let capacity = config.effective_parallelism();
        let mut slots = Vec::with_capacity(capacity);
        slots.resize_with(capacity, || None);

        let id = Uuid::new_v4();
        tracing::debug!(
            runner = %id,
            capacity,
            poll_interval = ?config.poll_interval,
            backpressure = config.backpressure,
            "tasks runner created"
        );

        Ok(Self {
            id,
            slots: Mutex::new(slots),
            poll_interval: config.poll_interval(),
            log_interval: config.effective_log_interval(),
            backpressure: config.backpressure,
            diagnostics: None,
        })
    }

    /// Attach a diagnostic sink.
    #[must_use]
    pub fn with_diagnostics(mut self, sink: Box<dyn DiagnosticSink>) -> Self {
        self.diagnostics = Some(Mutex::new(sink));
        self
    }

    /// Identifier used in log fields.
    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    /// Number of slots.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.slots.lock().len()
    }

    /// Delay between availability checks.
    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Snapshot of every slot, in index order.
    #[must_use]
    pub fn slot_states(&self) -> Vec<SlotState> {
        self.slots
            .lock()
            .iter()
            .map(|slot| match slot {
                None => SlotState::Empty,
                Some(work) if work.is_finished() => SlotState::Finished,
                Some(_) => SlotState::Running,
            })
            .collect()
    }

    /// Number of slots holding unfinished work.
    #[must_use]
    pub fn occupied_count(&self) -> usize {
        self.slots
            .lock()
            .iter()
            .filter(|slot| slot.as_ref().is_some_and(|work| !work.is_finished()))
            .count()
    }

    /// Install already-running work into the first free slot.
    ///
    /// Blocks (by polling) while every slot is occupied. With backpressure
    /// enabled, also waits until at least one slot is free again before
    /// returning, so back-to-back callers cannot run ahead of capacity.
    /// Cancellation during that trailing wait still reports `Admitted`.
    pub async fn run_task<W, C>(&self, work: W, cancel: &C) -> Admission
    where
        W: Work,
        C: CancelSignal + ?Sized,
    {
        self.admit(cancel, move || Box::new(work) as Box<dyn Work>)
            .await
    }

    /// Spawn `fut` on `spawner` once a slot is free.
    ///
    /// The future is spawned inside the claim step, so it never starts
    /// while all slots are occupied. A cancelled admission drops it unrun.
    pub async fn spawn_task<S, F, C>(&self, spawner: &S, fut: F, cancel: &C) -> Admission
    where
        S: Spawn,
        F: Future<Output = ()> + Send + 'static,
        C: CancelSignal + ?Sized,
    {
        self.admit(cancel, move || Box::new(spawner.spawn(fut)) as Box<dyn Work>)
            .await
    }

    /// Wait until every slot is empty or finished.
    ///
    /// Slots are checked in index order. On cancellation the remaining
    /// slots are left unchecked and their work keeps running.
    pub async fn wait_all<C>(&self, cancel: &C) -> Drain
    where
        C: CancelSignal + ?Sized,
    {
        if cancel.is_cancelled() {
            self.emit(RunnerEvent::CancelRequested);
            return Drain::Cancelled;
        }

        let mut tracer = TimeTracer::start(Some("wait_all"));
        self.emit(RunnerEvent::WaitingForAll);

        for index in 0..self.capacity() {
            while self.is_running(index) {
                if cancel.is_cancelled() {
                    self.emit(RunnerEvent::CancelRequested);
                    return Drain::Cancelled;
                }
                tokio::time::sleep(self.poll_interval).await;
            }
        }

        tracer.stop();
        self.emit(RunnerEvent::AllDrained);
        Drain::Drained
    }

    async fn admit<C, F>(&self, cancel: &C, install: F) -> Admission
    where
        C: CancelSignal + ?Sized,
        F: FnOnce() -> Box<dyn Work>,
    {
        let mut install = Some(install);
        let mut attempt = 0u32;
        let slot = loop {
            if cancel.is_cancelled() {
                self.emit(RunnerEvent::CancelRequested);
                return Admission::Cancelled;
            }

            attempt += 1;
            let mut events = Vec::new();
            let claimed = {
                let mut slots = self.slots.lock();
                let found = self.find_available(&slots, &mut attempt, &mut events);
                if let Some(index) = found {
                    // Release the finished occupant before storing the new one.
                    drop(slots[index].take());
                    events.push(RunnerEvent::Inserted { index });
                    slots[index] = install
                        .take()
                        .map(|install| install());
                }
                found
            };
            self.emit_all(events);
            if let Some(index) = claimed {
                break index;
            }

            tokio::time::sleep(self.poll_interval).await;
        };

        if self.backpressure {
            self.wait_one_if_required(cancel).await;
        }

        Admission::Admitted { slot }
    }

    /// Wait until at least one slot is free, without claiming it.
    async fn wait_one_if_required<C>(&self, cancel: &C)
    where
        C: CancelSignal + ?Sized,
    {
        let mut attempt = 0u32;
        loop {
            if cancel.is_cancelled() {
                self.emit(RunnerEvent::CancelRequested);
                return;
            }

            attempt += 1;
            let mut events = Vec::new();
            let found = {
                let slots = self.slots.lock();
                self.find_available(&slots, &mut attempt, &mut events).is_some()
            };
            self.emit_all(events);
            if found {
                self.emit(RunnerEvent::AtLeastOneSlotAvailable);
                return;
            }

            tokio::time::sleep(self.poll_interval).await;
        }
    }

    fn is_running(&self, index: usize) -> bool {
        self.slots
            .lock()
            .get(index)
            .and_then(Option::as_ref)
            .is_some_and(|work| !work.is_finished())
    }

    /// Lowest-index empty or finished slot. Busy diagnostics are collected on
    /// the first attempt and every `log_interval`-th one, after which the
    /// attempt counter restarts.
    ///
    /// Runs under the registry lock, so events are only buffered here and
    /// emitted by the caller once the guard is gone.
    fn find_available(
        &self,
        slots: &[Slot],
        attempt: &mut u32,
        events: &mut Vec<RunnerEvent>,
    ) -> Option<usize> {
        let report = *attempt == 1 || *attempt % self.log_interval == 0;

        for (index, slot) in slots.iter().enumerate() {
            match slot {
                Some(work) if !work.is_finished() => {
                    if report {
                        events.push(RunnerEvent::SlotBusy { index });
                    }
                }
                _ => {
                    events.push(RunnerEvent::SlotAvailable { index });
                    return Some(index);
                }
            }
        }

        if report {
            events.push(RunnerEvent::NoSlotAvailable { attempt: *attempt });
            if *attempt % self.log_interval == 0 {
                *attempt = 0;
            }
        }
        None
    }

    fn emit_all(&self, events: Vec<RunnerEvent>) {
        for event in events {
            self.emit(event);
        }
    }

    fn emit(&self, event: RunnerEvent) {
        match event {
            RunnerEvent::WaitingForAll | RunnerEvent::CancelRequested => {
                tracing::info!(runner = %self.id, "{event}");
            }
            RunnerEvent::AllDrained => tracing::debug!(runner = %self.id, "{event}"),
            _ => tracing::trace!(runner = %self.id, "{event}"),
        }
        if let Some(sink) = &self.diagnostics {
            sink.lock().record(event);
        }
    }
}
