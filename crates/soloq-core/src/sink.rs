//! Process-wide task sink.
//!
//! A single registration slot holds "the current handler for new tasks":
//! producers that do not hold a [`TaskQueue`] reference call [`submit`], and
//! the slot routes the task to whichever queue is installed. Exactly one
//! queue may be installed at a time; installing over a different live queue
//! is rejected (logged, not fatal).
//!
//! The slot holds a weak reference, so a queue that is dropped without being
//! uninstalled simply stops receiving; [`TaskQueue::deactivate`] also
//! releases the slot on its way down.

use std::sync::{Arc, Mutex, MutexGuard, PoisonError, Weak};

use crate::error::QueueError;
use crate::queue::{Shared, TaskQueue};
use crate::task::{Task, TaskId};

static SINK: Mutex<Option<Weak<Shared>>> = Mutex::new(None);

fn slot() -> MutexGuard<'static, Option<Weak<Shared>>> {
    SINK.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Register `queue` as the process-wide task sink.
///
/// Re-installing the current sink is a no-op. If a different live queue is
/// registered the call fails with [`QueueError::SinkOccupied`].
pub fn install(queue: &TaskQueue) -> Result<(), QueueError> {
    let shared = queue.shared();
    let mut slot = slot();
    if let Some(current) = slot.as_ref().and_then(Weak::upgrade) {
        if !Arc::ptr_eq(&current, shared) {
            tracing::warn!("task sink already registered by another queue");
            return Err(QueueError::SinkOccupied);
        }
        return Ok(());
    }
    *slot = Some(Arc::downgrade(shared));
    tracing::debug!("task sink installed");
    Ok(())
}

/// Remove the registration if `queue` currently holds it. Returns whether a
/// registration was removed.
pub fn uninstall(queue: &TaskQueue) -> bool {
    release(queue.shared())
}

pub(crate) fn release(shared: &Arc<Shared>) -> bool {
    let mut slot = slot();
    match slot.as_ref().and_then(Weak::upgrade) {
        Some(current) if Arc::ptr_eq(&current, shared) => {
            *slot = None;
            tracing::debug!("task sink released");
            true
        }
        _ => false,
    }
}

/// Route a task to the registered sink.
///
/// With no sink registered the task is not accepted and
/// [`QueueError::NoSink`] is returned. A submit racing with deactivation
/// observes [`QueueError::Inactive`].
pub fn submit(task: impl Task) -> Result<TaskId, QueueError> {
    let shared = slot().as_ref().and_then(Weak::upgrade);
    match shared {
        Some(shared) => TaskQueue::enqueue_shared(&shared, Box::new(task)),
        None => {
            tracing::debug!("task submitted with no sink registered");
            Err(QueueError::NoSink)
        }
    }
}
