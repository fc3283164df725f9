//! Status view: point-in-time counts for logs and diagnostics.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct QueueStatus {
    /// Whether the queue is currently accepting work.
    pub active: bool,

    /// Tasks accepted but not yet started.
    pub pending: usize,

    /// Tasks the worker has run (panicked tasks included).
    pub executed: u64,

    /// Tasks discarded without running: left pending at shutdown, or cleared
    /// by a re-activation.
    pub dropped: u64,
}
