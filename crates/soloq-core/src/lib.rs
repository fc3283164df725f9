//! soloq-core
//!
//! A single-consumer background task queue: producers hand opaque units of
//! work to the queue from any thread, and exactly one dedicated worker thread
//! runs them sequentially in FIFO order, parking when idle.
//!
//! # Module map
//! - **task**: the [`Task`] abstraction and per-enqueue [`TaskId`]
//! - **queue**: [`TaskQueue`] lifecycle (activate/deactivate) and enqueue
//! - **worker**: the consumer loop running on the dedicated thread
//! - **sink**: process-wide registration slot routing [`sink::submit`] calls
//!   to the currently installed queue
//! - **config**: [`QueueConfig`] (shutdown mode, panic isolation)
//! - **status**: [`QueueStatus`] snapshot for logs and diagnostics
//! - **error**: [`QueueError`]

pub mod config;
pub mod error;
pub mod queue;
pub mod sink;
pub mod status;
pub mod task;

mod worker;

pub use config::{QueueConfig, ShutdownMode};
pub use error::QueueError;
pub use queue::TaskQueue;
pub use status::QueueStatus;
pub use task::{Task, TaskId};
