use jiff::Timestamp;
use std::time::{Duration, Instant};

/// Upper bound on a single [`Clock::wait_until`] call of the system clock.
pub const MAX_WAIT: Duration = Duration::from_millis(10);

const SPIN_LIMIT: u32 = 64;
const POLL_INTERVAL: Duration = Duration::from_micros(50);

pub trait Clock: Send + Sync {
    /// Returns the current time of the clock
    fn now(&self) -> Timestamp;
    /// Block until the clock reaches the target time, or give up once the
    /// implementation's wait bound has elapsed.
    ///
    /// Callers must read [`Clock::now`] again afterwards; returning does not
    /// guarantee the target was reached.
    fn wait_until(&self, target: Timestamp);
}

/// Wall clock backed by [`Timestamp::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }

    fn wait_until(&self, target: Timestamp) {
        let deadline = Instant::now() + MAX_WAIT;
        let mut spins = 0;
        // Yield first: the target is normally less than a millisecond away.
        // Fall back to short sleeps so a stalled clock cannot peg a core.
        while Timestamp::now() < target {
            if Instant::now() >= deadline {
                return;
            }
            if spins < SPIN_LIMIT {
                spins += 1;
                std::thread::yield_now();
            } else {
                std::thread::sleep(POLL_INTERVAL);
            }
        }
    }
}
