use crate::Generator;
use pinhole_core::{base58, ShortCodeBase58, CODE_SPACE};
use pinhole_snowflake::{
    Clock, Error, ShortId, Snowflake, SnowflakeSettings, SystemClock, SEQUENCE_BITS, WORKER_BITS,
};
use tracing::trace;

/// Timestamp bits that survive in a short code.
///
/// A code keeps the low digits of the packed ID, so one worker's codes stay
/// distinct for at least `2^29` milliseconds (about six days).
pub const CODE_TIMESTAMP_BITS: u32 = 29;

const _: () = assert!(CODE_TIMESTAMP_BITS + WORKER_BITS + SEQUENCE_BITS <= 63);
const _: () = assert!(1_u64 << (CODE_TIMESTAMP_BITS + WORKER_BITS + SEQUENCE_BITS) <= CODE_SPACE);

/// Mints fixed-width base58 short codes from Snowflake IDs.
///
/// One instance is meant to be shared by every request handler of a worker
/// process; all calls serialize on the inner generator's lock.
pub struct ShortUrlGenerator<C: Clock = SystemClock> {
    inner: Snowflake<C>,
}

impl ShortUrlGenerator<SystemClock> {
    /// Creates a generator for `worker_id` with the default epoch.
    ///
    /// Fails with [`Error::InvalidWorkerId`] unless `0 <= worker_id <= 255`.
    pub fn new(worker_id: i64) -> Result<Self, Error> {
        Self::with_settings(SnowflakeSettings::builder().worker_id(worker_id).build())
    }

    pub fn with_settings(settings: SnowflakeSettings) -> Result<Self, Error> {
        Ok(Self {
            inner: Snowflake::new(settings)?,
        })
    }
}

impl<C: Clock> ShortUrlGenerator<C> {
    /// Wraps an existing Snowflake, e.g. one reading a custom [`Clock`].
    pub fn from_snowflake(inner: Snowflake<C>) -> Self {
        Self { inner }
    }

    pub fn worker_id(&self) -> u8 {
        self.inner.worker_id()
    }

    pub fn next_id(&self) -> Result<ShortId, Error> {
        self.inner.next_id()
    }

    /// Generates the next 7-character short code.
    ///
    /// Generator errors are returned unchanged; a
    /// [`Error::ClockMovedBackwards`] is worth retrying later.
    pub fn generate_short_url(&self) -> Result<ShortCodeBase58, Error> {
        let id = self.inner.next_id()?;
        let code = ShortCodeBase58::from(id);
        trace!(worker_id = id.worker_id(), id = %id, code = %code, "generated short code");
        Ok(code)
    }

    /// Checks that `code` consists of base58 digits only.
    ///
    /// This is a syntactic check: it does not tell whether the code was ever
    /// issued.
    pub fn is_valid_short_url(&self, code: &str) -> bool {
        base58::is_valid(code)
    }
}

impl<C: Clock + 'static> Generator for ShortUrlGenerator<C> {
    type Output = ShortCodeBase58;
    type Error = Error;

    fn generate(&self) -> Result<Self::Output, Self::Error> {
        self.generate_short_url()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jiff::Timestamp;
    use pinhole_core::{ALPHABET, CODE_WIDTH};
    use pinhole_snowflake::MAX_SEQUENCE;
    use std::collections::HashSet;
    use std::sync::atomic::{AtomicI64, Ordering};
    use std::sync::Arc;

    /// Millisecond clock moved by hand; waiting jumps straight to the target.
    #[derive(Clone)]
    struct ManualClock(Arc<AtomicI64>);

    impl ManualClock {
        fn at(ms: i64) -> Self {
            Self(Arc::new(AtomicI64::new(ms)))
        }

        fn set(&self, ms: i64) {
            self.0.store(ms, Ordering::SeqCst);
        }
    }

    impl Clock for ManualClock {
        fn now(&self) -> Timestamp {
            Timestamp::from_millisecond(self.0.load(Ordering::SeqCst)).unwrap()
        }

        fn wait_until(&self, target: Timestamp) {
            self.0.fetch_max(target.as_millisecond(), Ordering::SeqCst);
        }
    }

    const EPOCH_MS: i64 = 1_704_067_200_000;

    fn manual_generator(worker_id: i64, clock: ManualClock) -> ShortUrlGenerator<ManualClock> {
        let settings = SnowflakeSettings::builder().worker_id(worker_id).build();
        ShortUrlGenerator::from_snowflake(Snowflake::with_clock(settings, clock).unwrap())
    }

    #[test]
    fn construction_bounds() {
        assert!(ShortUrlGenerator::new(0).is_ok());
        assert!(ShortUrlGenerator::new(255).is_ok());
        assert!(matches!(
            ShortUrlGenerator::new(-1),
            Err(Error::InvalidWorkerId { worker_id: -1, .. })
        ));
        assert!(matches!(
            ShortUrlGenerator::new(256),
            Err(Error::InvalidWorkerId { worker_id: 256, .. })
        ));
    }

    #[test]
    fn codes_are_fixed_width_and_unambiguous() {
        let generator = ShortUrlGenerator::new(1).unwrap();
        let mut seen = HashSet::new();
        for _ in 0..1_000 {
            let code = generator.generate_short_url().unwrap();
            assert_eq!(code.as_str().len(), CODE_WIDTH, "{code}");
            assert!(code.as_str().chars().all(|c| ALPHABET.contains(c)), "{code}");
            assert!(!code.as_str().contains(['0', 'O', 'I', 'l']), "{code}");
            assert!(seen.insert(code.clone()), "duplicate code {code}");
        }
    }

    #[test]
    fn code_spells_low_digits_of_the_id() {
        let clock = ManualClock::at(EPOCH_MS + 1_000);
        let generator = manual_generator(2, clock);
        let code = generator.generate_short_url().unwrap();
        let expected = (1_000_u64 << 12) | (2 << 4);
        assert_eq!(code.value(), expected);
        assert_eq!(base58::decode(code.as_str()), Ok(expected));
    }

    #[test]
    fn exhausted_millisecond_rolls_over_without_duplicates() {
        let clock = ManualClock::at(EPOCH_MS + 50);
        let generator = manual_generator(9, clock.clone());

        let values: Vec<u64> = (0..=MAX_SEQUENCE as usize + 1)
            .map(|_| generator.generate_short_url().unwrap().value())
            .collect();

        assert!(values.windows(2).all(|pair| pair[0] < pair[1]));
        // the 17th code belongs to the next millisecond, sequence 0
        let last = ShortId::from(*values.last().unwrap());
        assert_eq!(last.timestamp(), 51);
        assert_eq!(last.sequence(), 0);
        assert_eq!(clock.now().as_millisecond(), EPOCH_MS + 51);
    }

    #[test]
    fn clock_regression_is_propagated() {
        let clock = ManualClock::at(EPOCH_MS + 500);
        let generator = manual_generator(0, clock.clone());
        generator.generate_short_url().unwrap();

        clock.set(EPOCH_MS + 499);
        let err = generator.generate_short_url().unwrap_err();
        assert_eq!(
            err,
            Error::ClockMovedBackwards {
                last_ms: EPOCH_MS + 500,
                now_ms: EPOCH_MS + 499,
            }
        );
        assert!(err.is_retryable());
    }

    #[test]
    fn legitimacy_check_is_syntactic() {
        let generator = ShortUrlGenerator::new(0).unwrap();
        let code = generator.generate_short_url().unwrap();
        assert!(generator.is_valid_short_url(code.as_str()));

        assert!(generator.is_valid_short_url("2"));
        assert!(generator.is_valid_short_url("abcdefghijkmnopqrstuvwxyz123"));
        assert!(!generator.is_valid_short_url("!!!!!!!"));
        assert!(!generator.is_valid_short_url("abc0def"));
        assert!(!generator.is_valid_short_url("abcdefl"));
    }

    #[test]
    fn generator_trait_produces_codes() {
        fn mint<G: Generator>(generator: &G) -> ShortCodeBase58 {
            generator.generate().unwrap().into()
        }

        let generator = ShortUrlGenerator::new(3).unwrap();
        let first = mint(&generator);
        let second = mint(&generator);
        assert_ne!(first, second);
    }

    #[test]
    fn generator_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<ShortUrlGenerator>();
    }
}
