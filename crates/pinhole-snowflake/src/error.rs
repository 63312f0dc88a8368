use jiff::Timestamp;
use thiserror::Error;

/// Errors returned by Snowflake initialization and ID generation.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum Error {
    #[error("invalid worker id {worker_id}; expected 0..={max_worker_id}")]
    InvalidWorkerId { worker_id: i64, max_worker_id: u8 },
    #[error("clock moved backwards: last={last_ms}ms, now={now_ms}ms")]
    ClockMovedBackwards { last_ms: i64, now_ms: i64 },
    #[error("epoch is ahead of current clock time: epoch={epoch}, now={now}")]
    EpochAhead { epoch: Timestamp, now: Timestamp },
    #[error("overtime limit")]
    OverTimeLimit,
    #[error("generator state lock is poisoned")]
    StatePoisoned,
}

impl Error {
    /// Whether the caller may retry the same call later.
    ///
    /// Only a clock regression is transient; everything else either needs a
    /// configuration change or indicates a broken generator.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Error::ClockMovedBackwards { .. })
    }

    /// Whether the error stems from the settings the generator was built with.
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            Error::InvalidWorkerId { .. } | Error::EpochAhead { .. }
        )
    }
}
