use crate::{
    clock::{Clock, SystemClock},
    error::Error,
    short_id::{MAX_SEQUENCE, MAX_TIMESTAMP, MAX_WORKER_ID},
    ShortId,
};
use jiff::Timestamp;
use std::sync::Mutex;
use tracing::{trace, warn};
use typed_builder::TypedBuilder;

/// 2024-01-01T00:00:00Z
pub const DEFAULT_EPOCH: Timestamp = Timestamp::constant(1_704_067_200, 0);

/// Configures a Snowflake generator instance.
#[derive(Debug, Clone, Copy, TypedBuilder)]
pub struct SnowflakeSettings {
    /// A unique worker index in the range `[0, 255]`.
    ///
    /// Accepted as a signed value so that out-of-range input coming from
    /// configuration is reported as [`Error::InvalidWorkerId`] rather than
    /// being wrapped or rejected by a parser.
    #[builder]
    pub worker_id: i64,
    /// Custom epoch used as the zero point for the timestamp field.
    #[builder(default = DEFAULT_EPOCH)]
    pub start_epoch: Timestamp,
}

#[derive(Debug, Default)]
struct GeneratorState {
    /// Millisecond of the last minted ID (Unix time).
    last_timestamp: i64,
    sequence: u8,
}

/// Millisecond Snowflake generator.
///
/// All mutable state sits behind one mutex, so IDs from a single instance are
/// strictly increasing in the order calls complete.
pub struct Snowflake<C: Clock = SystemClock> {
    start_time: Timestamp,
    start_ms: i64,
    worker_id: u8,
    clock: C,
    state: Mutex<GeneratorState>,
}

impl Snowflake<SystemClock> {
    /// Creates a generator backed by the real system clock.
    pub fn new(settings: SnowflakeSettings) -> Result<Self, Error> {
        Self::with_clock(settings, SystemClock)
    }
}

impl<C: Clock> Snowflake<C> {
    /// Creates a generator that reads time from `clock`.
    pub fn with_clock(settings: SnowflakeSettings, clock: C) -> Result<Self, Error> {
        let worker_id = u8::try_from(settings.worker_id)
            .ok()
            .filter(|id| *id <= MAX_WORKER_ID)
            .ok_or(Error::InvalidWorkerId {
                worker_id: settings.worker_id,
                max_worker_id: MAX_WORKER_ID,
            })?;

        let now = clock.now();
        if settings.start_epoch > now {
            return Err(Error::EpochAhead {
                epoch: settings.start_epoch,
                now,
            });
        }

        Ok(Self {
            start_time: settings.start_epoch,
            start_ms: settings.start_epoch.as_millisecond(),
            worker_id,
            clock,
            state: Mutex::new(GeneratorState::default()),
        })
    }

    pub fn worker_id(&self) -> u8 {
        self.worker_id
    }

    pub fn start_epoch(&self) -> Timestamp {
        self.start_time
    }

    /// Generates the next unique ShortId.
    ///
    /// - a clock reading behind the last minted millisecond fails with
    ///   [`Error::ClockMovedBackwards`]; nothing is corrected or awaited
    /// - once the per-millisecond sequence is exhausted, the call waits for
    ///   the next millisecond and mints sequence 0 there
    ///
    /// State is only written once an ID is certain to be returned.
    pub fn next_id(&self) -> Result<ShortId, Error> {
        let mut state = self.state.lock().map_err(|_| Error::StatePoisoned)?;

        let mut now = self.clock.now();
        let last = state.last_timestamp;

        if now.as_millisecond() < last {
            warn!(
                worker_id = self.worker_id,
                last_ms = last,
                now_ms = now.as_millisecond(),
                "clock moved backwards"
            );
            return Err(Error::ClockMovedBackwards {
                last_ms: last,
                now_ms: now.as_millisecond(),
            });
        }

        let sequence = if now.as_millisecond() == last {
            let next = (state.sequence + 1) & MAX_SEQUENCE;
            if next == 0 {
                now = self.wait_next_millisecond(last)?;
            }
            next
        } else {
            0
        };

        let now_ms = now.as_millisecond();
        let elapsed = now_ms - self.start_ms;
        if elapsed < 0 {
            return Err(Error::EpochAhead {
                epoch: self.start_time,
                now,
            });
        }
        if elapsed as u64 > MAX_TIMESTAMP {
            return Err(Error::OverTimeLimit);
        }

        state.last_timestamp = now_ms;
        state.sequence = sequence;

        Ok(ShortId::new()
            .with_timestamp(elapsed as u64)
            .with_worker_id(self.worker_id)
            .with_sequence(sequence))
    }

    fn wait_next_millisecond(&self, last: i64) -> Result<Timestamp, Error> {
        trace!(
            worker_id = self.worker_id,
            last_ms = last,
            "sequence exhausted, waiting for the next millisecond"
        );

        let target = Timestamp::from_millisecond(last + 1).map_err(|_| Error::OverTimeLimit)?;
        self.clock.wait_until(target);

        let now = self.clock.now();
        if now < target {
            warn!(
                worker_id = self.worker_id,
                last_ms = last,
                now_ms = now.as_millisecond(),
                "clock did not advance past an exhausted millisecond"
            );
            return Err(Error::ClockMovedBackwards {
                last_ms: last,
                now_ms: now.as_millisecond(),
            });
        }
        Ok(now)
    }
}
