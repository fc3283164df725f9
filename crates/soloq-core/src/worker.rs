//! Worker loop: drains the shared FIFO on one dedicated thread.

use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::{Arc, PoisonError};

use crate::config::ShutdownMode;
use crate::queue::{QueuedTask, Shared};

pub(crate) const THREAD_NAME: &str = "soloq-worker";

/// Runs until the shutdown flag is observed.
///
/// Tasks execute outside the lock, so a long-running task never blocks
/// producers. An empty FIFO parks on the condvar; spurious wakeups fall
/// through to a re-check of the flag and the FIFO.
pub(crate) fn run(shared: Arc<Shared>) {
    tracing::debug!("worker thread started");
    let mut inner = shared.lock();
    loop {
        if inner.terminating
            && (shared.config.shutdown_mode == ShutdownMode::Drop || inner.pending.is_empty())
        {
            break;
        }
        if let Some(queued) = inner.pending.pop_front() {
            drop(inner);
            execute(queued, shared.config.catch_panics);
            inner = shared.lock();
            inner.executed += 1;
        } else {
            inner = shared
                .wake
                .wait(inner)
                .unwrap_or_else(PoisonError::into_inner);
        }
    }
    drop(inner);
    tracing::debug!("worker thread stopped");
}

fn execute(queued: QueuedTask, catch_panics: bool) {
    let QueuedTask { id, task } = queued;
    tracing::trace!(task_id = %id, "task starting");
    if catch_panics {
        if let Err(panic) = catch_unwind(AssertUnwindSafe(|| task.run())) {
            tracing::error!(task_id = %id, panic = panic_message(&panic), "task panicked");
        }
    } else {
        // reference behavior: an unhandled panic unwinds out of the loop and
        // ends the worker thread
        task.run();
    }
}

fn panic_message(panic: &(dyn std::any::Any + Send)) -> &str {
    if let Some(message) = panic.downcast_ref::<&str>() {
        message
    } else if let Some(message) = panic.downcast_ref::<String>() {
        message
    } else {
        "non-string panic payload"
    }
}
