//! Background task handles for asynchronous terminals.

use crate::error::{CoreError, CoreResult};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// A handle to one background query execution.
///
/// Each background terminal spawns one dedicated thread - no pooling, no
/// queueing - and delivers the typed result **or error** through this
/// handle. Delivery happens wherever the caller consumes the handle, so the
/// execution context is explicitly caller-owned rather than an implicit
/// dispatcher.
///
/// There is no ordering guarantee across concurrently spawned tasks; the
/// only guarantee is within one task (its schema creation, if any, happens
/// before its data operation).
///
/// `cancel()` discards delivery. The in-flight backend round trip itself is
/// not interruptible - the worker runs to completion and its result is
/// dropped.
#[must_use = "a query task does nothing for the caller until joined"]
pub struct QueryTask<R> {
    receiver: Receiver<CoreResult<R>>,
    cancelled: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl<R: Send + 'static> QueryTask<R> {
    /// Spawns one background unit of work.
    pub(crate) fn spawn<F>(work: F) -> Self
    where
        F: FnOnce() -> CoreResult<R> + Send + 'static,
    {
        let (sender, receiver) = mpsc::channel();
        let cancelled = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&cancelled);
        let handle = thread::spawn(move || {
            let result = work();
            if !flag.load(Ordering::SeqCst) {
                // The receiver may already be gone; that only means nobody
                // is listening.
                let _ = sender.send(result);
            }
        });
        Self {
            receiver,
            cancelled,
            handle: Some(handle),
        }
    }

    /// Blocks until the background unit completes and returns its outcome.
    ///
    /// # Errors
    ///
    /// Returns the query's own error if it failed, or
    /// [`CoreError::TaskFailed`] if the worker terminated without
    /// delivering (e.g. it panicked).
    pub fn join(mut self) -> CoreResult<R> {
        let result = self.receiver.recv().map_err(|_| CoreError::TaskFailed)?;
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
        result
    }

    /// Returns the outcome if the background unit already completed,
    /// without blocking.
    pub fn try_result(&mut self) -> Option<CoreResult<R>> {
        match self.receiver.try_recv() {
            Ok(result) => Some(result),
            Err(TryRecvError::Empty) => None,
            Err(TryRecvError::Disconnected) => Some(Err(CoreError::TaskFailed)),
        }
    }

    /// Check whether the background unit has finished running.
    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancels delivery and detaches the task.
    ///
    /// The background unit is not interrupted; it runs to completion and
    /// its result is discarded.
    pub fn cancel(mut self) {
        self.cancelled.store(true, Ordering::SeqCst);
        // Detach: dropping the handle leaves the worker running.
        self.handle.take();
    }
}
