//! Task abstraction: opaque units of work executed by the worker.

use std::fmt;

use serde::{Deserialize, Serialize};
use ulid::Ulid;

/// An opaque unit of work.
///
/// Ownership moves to the queue on enqueue; the worker runs the task exactly
/// once and drops it. The queue never inspects a task beyond running it: no
/// ordering key, no priority, no cancellation token.
pub trait Task: Send + 'static {
    fn run(self: Box<Self>);
}

impl<F> Task for F
where
    F: FnOnce() + Send + 'static,
{
    fn run(self: Box<Self>) {
        (*self)()
    }
}

/// Identifier assigned when a task is accepted, used for log correlation.
///
/// ULIDs sort by creation time, so ids also reflect enqueue order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct TaskId(Ulid);

impl TaskId {
    pub(crate) fn generate() -> Self {
        Self(Ulid::new())
    }

    pub fn as_ulid(&self) -> Ulid {
        self.0
    }
}

impl fmt::Display for TaskId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "task-{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_task_prefix() {
        let id = TaskId::generate();
        let shown = id.to_string();
        assert!(shown.starts_with("task-"));
        assert_eq!(shown.len(), "task-".len() + 26); // ULID text form is 26 chars
    }

    #[test]
    fn ids_are_unique_across_calls() {
        let a = TaskId::generate();
        let b = TaskId::generate();
        assert_ne!(a, b);
    }
}
