//! Queue lifecycle and submission.
//!
//! Design intent:
//! - A [`TaskQueue`] is an explicitly owned instance; nothing forces it to be
//!   process-global, so independent queues coexist and tests need no shared
//!   state. The optional global routing lives in [`crate::sink`].
//! - All shared mutable state (the FIFO, the shutdown flag, the counters)
//!   sits behind one mutex paired with a condvar. The shutdown flag is read
//!   and written only under the lock, which doubles as the guard that makes
//!   an enqueue racing with deactivation well-defined: the late enqueue is
//!   rejected instead of touching torn state.

use std::collections::VecDeque;
use std::sync::{Arc, Condvar, Mutex, MutexGuard, PoisonError};
use std::thread::{self, JoinHandle};

use crate::config::QueueConfig;
use crate::error::QueueError;
use crate::status::QueueStatus;
use crate::task::{Task, TaskId};
use crate::{sink, worker};

/// A task plus the id assigned when it was accepted.
pub(crate) struct QueuedTask {
    pub(crate) id: TaskId,
    pub(crate) task: Box<dyn Task>,
}

/// Lock-guarded queue state.
pub(crate) struct Inner {
    /// FIFO of accepted tasks; insertion order is execution order.
    pub(crate) pending: VecDeque<QueuedTask>,

    /// True whenever no worker should run: before the first activation,
    /// during shutdown, and after deactivation.
    pub(crate) terminating: bool,

    pub(crate) executed: u64,
    pub(crate) dropped: u64,
}

/// State shared between the queue handle, the worker thread, and the sink.
pub(crate) struct Shared {
    pub(crate) inner: Mutex<Inner>,
    /// Wake signal: set on enqueue and on shutdown, waited on by an idle
    /// worker.
    pub(crate) wake: Condvar,
    pub(crate) config: QueueConfig,
}

impl Shared {
    /// A panicking task never holds this lock (tasks run outside it), so a
    /// poisoned mutex carries no broken invariants and is safe to re-enter.
    pub(crate) fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

/// Single-consumer task queue.
///
/// Between [`activate`](TaskQueue::activate) and
/// [`deactivate`](TaskQueue::deactivate) one dedicated worker thread drains
/// the FIFO; outside that window [`enqueue`](TaskQueue::enqueue) rejects work.
/// Dropping the queue deactivates it, so the worker thread never leaks.
pub struct TaskQueue {
    shared: Arc<Shared>,
    /// Handle of the running worker, if any. Guarded so `activate` and
    /// `deactivate` serialize against each other.
    worker: Mutex<Option<JoinHandle<()>>>,
    /// Test hook: force the next worker spawn to fail.
    #[cfg(test)]
    fail_spawn: std::sync::atomic::AtomicBool,
}

impl TaskQueue {
    /// Allocate an inactive queue. No thread is spawned until
    /// [`activate`](TaskQueue::activate).
    pub fn new(config: QueueConfig) -> Self {
        Self {
            shared: Arc::new(Shared {
                inner: Mutex::new(Inner {
                    pending: VecDeque::new(),
                    terminating: true,
                    executed: 0,
                    dropped: 0,
                }),
                wake: Condvar::new(),
                config,
            }),
            worker: Mutex::new(None),
            #[cfg(test)]
            fail_spawn: std::sync::atomic::AtomicBool::new(false),
        }
    }

    /// Start the worker thread.
    ///
    /// Calling this while the worker is already running logs a warning and
    /// changes nothing. If a previous worker ended on its own (a fatal task
    /// panic with isolation disabled), it is joined and replaced.
    pub fn activate(&self) -> Result<(), QueueError> {
        let mut slot = self.worker_slot();
        if let Some(handle) = slot.take() {
            if !handle.is_finished() {
                tracing::warn!("activate called while the worker is running; ignoring");
                *slot = Some(handle);
                return Ok(());
            }
            if handle.join().is_err() {
                tracing::error!("previous worker thread had panicked");
            }
        }

        {
            let mut inner = self.shared.lock();
            let stale = inner.pending.len();
            if stale > 0 {
                inner.dropped += stale as u64;
                inner.pending.clear();
                tracing::debug!(dropped = stale, "cleared stale tasks on activation");
            }
            inner.terminating = false;
        }

        let handle = match self.spawn_worker() {
            Ok(handle) => handle,
            Err(e) => {
                // no worker started: the queue must not report active
                self.shared.lock().terminating = true;
                return Err(QueueError::Spawn(e));
            }
        };
        *slot = Some(handle);
        tracing::debug!("queue activated");
        Ok(())
    }

    fn spawn_worker(&self) -> std::io::Result<JoinHandle<()>> {
        #[cfg(test)]
        if self.fail_spawn.load(std::sync::atomic::Ordering::SeqCst) {
            return Err(std::io::Error::other("injected spawn failure"));
        }
        let shared = Arc::clone(&self.shared);
        thread::Builder::new()
            .name(worker::THREAD_NAME.to_string())
            .spawn(move || worker::run(shared))
    }

    /// Stop the worker thread and wait for it to exit.
    ///
    /// The in-flight task (if any) finishes first. What happens to tasks
    /// still pending depends on [`ShutdownMode`](crate::ShutdownMode). This
    /// is the only blocking call in the public contract; calling it on an
    /// inactive queue is a no-op.
    pub fn deactivate(&self) {
        let mut slot = self.worker_slot();
        let Some(handle) = slot.take() else {
            tracing::debug!("deactivate called on an inactive queue; ignoring");
            return;
        };

        sink::release(&self.shared);

        {
            let mut inner = self.shared.lock();
            inner.terminating = true;
        }
        self.shared.wake.notify_all();

        if handle.join().is_err() {
            tracing::error!("worker thread panicked during task execution");
        }

        let mut inner = self.shared.lock();
        let leftover = inner.pending.len();
        if leftover > 0 {
            inner.dropped += leftover as u64;
            inner.pending.clear();
            tracing::debug!(dropped = leftover, "discarded tasks pending at shutdown");
        }
        drop(inner);
        tracing::debug!("queue deactivated");
    }

    /// Accept a task from any thread. Never blocks beyond lock contention.
    ///
    /// Rejected with [`QueueError::Inactive`] when the queue is not running,
    /// including an enqueue that races with [`deactivate`](TaskQueue::deactivate).
    pub fn enqueue(&self, task: impl Task) -> Result<TaskId, QueueError> {
        Self::enqueue_shared(&self.shared, Box::new(task))
    }

    pub(crate) fn enqueue_shared(
        shared: &Shared,
        task: Box<dyn Task>,
    ) -> Result<TaskId, QueueError> {
        let id = TaskId::generate();
        {
            let mut inner = shared.lock();
            if inner.terminating {
                return Err(QueueError::Inactive);
            }
            inner.pending.push_back(QueuedTask { id, task });
        }
        shared.wake.notify_one();
        tracing::trace!(task_id = %id, "task enqueued");
        Ok(id)
    }

    /// Point-in-time snapshot of queue state.
    pub fn status(&self) -> QueueStatus {
        let inner = self.shared.lock();
        QueueStatus {
            active: !inner.terminating,
            pending: inner.pending.len(),
            executed: inner.executed,
            dropped: inner.dropped,
        }
    }

    pub fn config(&self) -> &QueueConfig {
        &self.shared.config
    }

    pub(crate) fn shared(&self) -> &Arc<Shared> {
        &self.shared
    }

    fn worker_slot(&self) -> MutexGuard<'_, Option<JoinHandle<()>>> {
        self.worker.lock().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Drop for TaskQueue {
    fn drop(&mut self) {
        self.deactivate();
    }
}
