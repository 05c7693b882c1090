//! Diagnostic sink implementations.
//!
//! Every runner event is logged through `tracing`. A sink can be attached
//! additionally to capture events programmatically (tests, dashboards).

use std::collections::VecDeque;
use std::fmt;

/// Observable runner events.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunnerEvent {
    /// A free or finished slot was found.
    SlotAvailable {
        /// Slot index.
        index: usize,
    },
    /// A slot still holds running work (subject to log cadence).
    SlotBusy {
        /// Slot index.
        index: usize,
    },
    /// A full scan found every slot occupied (subject to log cadence).
    NoSlotAvailable {
        /// Scan attempt that produced the event.
        attempt: u32,
    },
    /// A unit of work was installed.
    Inserted {
        /// Slot index.
        index: usize,
    },
    /// The trailing wait after an insertion observed a free slot.
    AtLeastOneSlotAvailable,
    /// A drain barrier started.
    WaitingForAll,
    /// Every slot was confirmed finished or empty.
    AllDrained,
    /// Cancellation was observed at a poll boundary.
    CancelRequested,
}

impl fmt::Display for RunnerEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SlotAvailable { index } => write!(f, "found available slot at index {index}"),
            Self::SlotBusy { index } => write!(f, "slot at index {index} has running task"),
            Self::NoSlotAvailable { attempt } => {
                write!(f, "no available slot found (attempt {attempt})")
            }
            Self::Inserted { index } => write!(f, "inserting task into index {index}"),
            Self::AtLeastOneSlotAvailable => write!(f, "at least one task slot is available"),
            Self::WaitingForAll => write!(f, "waiting for all tasks to complete"),
            Self::AllDrained => write!(f, "all tasks completed"),
            Self::CancelRequested => write!(f, "cancel requested"),
        }
    }
}

/// Diagnostic sink abstraction.
///
/// Events are delivered after the slot registry lock is released, so a sink
/// may call back into the runner.
pub trait DiagnosticSink: Send {
    /// Record a runner event.
    fn record(&mut self, event: RunnerEvent);
}

/// In-memory diagnostic sink for testing and dev.
pub struct InMemoryDiagnosticSink {
    events: VecDeque<RunnerEvent>,
    max_events: usize,
}

impl InMemoryDiagnosticSink {
    /// Create a new in-memory sink with a bounded buffer.
    #[must_use]
    pub fn new(max_events: usize) -> Self {
        Self {
            events: VecDeque::with_capacity(max_events),
            max_events,
        }
    }

    /// Retrieve a snapshot of stored events.
    #[must_use]
    pub fn events(&self) -> Vec<RunnerEvent> {
        self.events.iter().copied().collect()
    }
}

impl DiagnosticSink for InMemoryDiagnosticSink {
    fn record(&mut self, event: RunnerEvent) {
        if self.max_events == 0 {
            return;
        }
        if self.events.len() >= self.max_events {
            self.events.pop_front();
        }
        self.events.push_back(event);
    }
}

/// Forward events to a shared sink so tests can inspect them after
/// handing ownership to the runner.
impl<S: DiagnosticSink + ?Sized> DiagnosticSink for std::sync::Arc<parking_lot::Mutex<S>> {
    fn record(&mut self, event: RunnerEvent) {
        self.lock().record(event);
    }
}
