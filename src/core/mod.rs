//! Core admission control: the bounded runner and its seams.

pub mod diagnostics;
pub mod error;
pub mod tasks_runner;
pub mod work;

pub use diagnostics::{DiagnosticSink, InMemoryDiagnosticSink, RunnerEvent};
pub use error::{AppResult, RunnerError};
pub use tasks_runner::{Admission, Drain, SlotState, TasksRunner};
pub use work::{CancelSignal, CompletionFlag, Spawn, Work};
