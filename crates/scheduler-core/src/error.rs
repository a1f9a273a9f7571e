use thiserror::Error;

/// Error taxonomy from spec.md §7. The scheduler loop itself never returns
/// one of these — `SignalLost` and `SleepInterrupted` are absorbed
/// internally (see `scheduler.rs`); only the startup and submit-time
/// variants ever surface to a caller.
#[derive(Debug, Error)]
pub enum SchedulerError {
    #[error("invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("job table is full (capacity {capacity})")]
    TableFull { capacity: usize },

    #[error("ready queue is full (capacity {capacity})")]
    QueueFull { capacity: usize },

    #[error("failed to spawn process: {0}")]
    SpawnFailed(#[source] std::io::Error),
}
