use thiserror::Error;

#[derive(Debug, Error)]
pub enum QueueError {
    /// The queue is not accepting work: never activated, shutting down, or
    /// already deactivated.
    #[error("queue is not active")]
    Inactive,

    /// No task sink is registered to receive submitted tasks.
    #[error("no task sink is registered")]
    NoSink,

    /// A different live queue already holds the sink registration.
    #[error("another task sink is already registered")]
    SinkOccupied,

    #[error("failed to load config: {0}")]
    Config(String),

    #[error("failed to spawn worker thread")]
    Spawn(#[source] std::io::Error),
}
