//! Millisecond Snowflake ID generation.
//!
//! IDs pack `timestamp << 12 | worker_id << 4 | sequence` into 63 bits and are
//! strictly increasing per generator instance.

mod clock;
pub mod error;
mod short_id;
mod snowflake;

pub use clock::{Clock, SystemClock, MAX_WAIT};
pub use error::Error;
pub use short_id::{
    ShortId, MAX_SEQUENCE, MAX_TIMESTAMP, MAX_WORKER_ID, SEQUENCE_BITS, TIMESTAMP_BITS,
    WORKER_BITS,
};
pub use snowflake::{Snowflake, SnowflakeSettings, DEFAULT_EPOCH};
