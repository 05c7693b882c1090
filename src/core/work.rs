//! Unit-of-work, cancellation and spawning seams consumed by the runner.
//!
//! The runner never creates, introspects or retries work. It only needs to
//! ask "has this finished yet?", which is what [`Work`] expresses. Completion
//! is a polled predicate, never a push notification.

use std::future::Future;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// An in-flight unit of work whose completion can be polled.
///
/// Dropping the value releases whatever it holds; the runner drops a
/// finished occupant right before reusing its slot.
pub trait Work: Send + 'static {
    /// Returns `true` once the work has completed (successfully or not).
    fn is_finished(&self) -> bool;
}

impl<T: Send + 'static> Work for JoinHandle<T> {
    fn is_finished(&self) -> bool {
        JoinHandle::is_finished(self)
    }
}

impl<T: Send + 'static> Work for std::thread::JoinHandle<T> {
    fn is_finished(&self) -> bool {
        std::thread::JoinHandle::is_finished(self)
    }
}

/// Lets the caller keep a clone of the work (and its outcome) while the
/// runner tracks completion.
impl<W: Work + Sync> Work for Arc<W> {
    fn is_finished(&self) -> bool {
        W::is_finished(self)
    }
}

impl Work for Box<dyn Work> {
    fn is_finished(&self) -> bool {
        (**self).is_finished()
    }
}

/// Manually completed unit of work.
///
/// Useful when the actual work runs outside tokio (a callback API, a
/// foreign thread pool) and only signals when it is done.
#[derive(Debug, Clone, Default)]
pub struct CompletionFlag {
    done: Arc<AtomicBool>,
}

impl CompletionFlag {
    /// Create a flag in the unfinished state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mark the work as finished. Idempotent.
    pub fn complete(&self) {
        self.done.store(true, Ordering::Release);
    }
}

impl Work for CompletionFlag {
    fn is_finished(&self) -> bool {
        self.done.load(Ordering::Acquire)
    }
}

/// Cooperative cancellation signal, polled at wait boundaries.
pub trait CancelSignal {
    /// Returns `true` once cancellation has been requested.
    fn is_cancelled(&self) -> bool;
}

impl CancelSignal for CancellationToken {
    fn is_cancelled(&self) -> bool {
        CancellationToken::is_cancelled(self)
    }
}

impl CancelSignal for AtomicBool {
    fn is_cancelled(&self) -> bool {
        self.load(Ordering::Acquire)
    }
}

impl<C: CancelSignal + ?Sized> CancelSignal for Arc<C> {
    fn is_cancelled(&self) -> bool {
        C::is_cancelled(self)
    }
}

/// Abstraction for spawning work onto a runtime.
pub trait Spawn {
    /// Spawn a future and return a handle that reports its completion.
    fn spawn<F>(&self, fut: F) -> JoinHandle<()>
    where
        F: Future<Output = ()> + Send + 'static;
}
