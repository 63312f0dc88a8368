use modular_bitfield::prelude::*;
use std::cmp::Ordering;
use std::fmt;

pub const SEQUENCE_BITS: u32 = 4;
pub const WORKER_BITS: u32 = 8;
/// Width of the timestamp field inside the 64-bit value. The most
/// significant bit stays clear so every ID is also a valid `i64`.
pub const TIMESTAMP_BITS: u32 = 51;

pub const MAX_SEQUENCE: u8 = ((1_u16 << SEQUENCE_BITS) - 1) as u8;
pub const MAX_WORKER_ID: u8 = ((1_u16 << WORKER_BITS) - 1) as u8;
pub const MAX_TIMESTAMP: u64 = (1_u64 << TIMESTAMP_BITS) - 1;

const _: () = assert!(SEQUENCE_BITS + WORKER_BITS + TIMESTAMP_BITS <= 63);

/// A packed 64-bit identifier.
///
/// Fields are laid out from the least significant bit, so the numeric value is
/// `timestamp << 12 | worker_id << 4 | sequence`.
#[bitfield]
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ShortId {
    /// 4 bits for sequence number (resets every millisecond).
    pub sequence: B4,
    /// 8 bits for worker ID (allows up to 256 workers).
    pub worker_id: B8,
    /// 51 bits for timestamp (milliseconds since a custom epoch).
    pub timestamp: B51,
    #[skip]
    __: B1,
}

impl ShortId {
    pub fn as_u64(&self) -> u64 {
        u64::from_le_bytes(self.into_bytes())
    }
}

impl From<ShortId> for u64 {
    fn from(id: ShortId) -> Self {
        id.as_u64()
    }
}

impl From<u64> for ShortId {
    fn from(value: u64) -> Self {
        ShortId::from_bytes(value.to_le_bytes())
    }
}

impl PartialOrd for ShortId {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ShortId {
    fn cmp(&self, other: &Self) -> Ordering {
        self.as_u64().cmp(&other.as_u64())
    }
}

impl fmt::Debug for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ShortId")
            .field("timestamp", &self.timestamp())
            .field("worker_id", &self.worker_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}

impl fmt::Display for ShortId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_u64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn layout_matches_shift_arithmetic() {
        let id = ShortId::new()
            .with_timestamp(123_456_789)
            .with_worker_id(0xAB)
            .with_sequence(0x7);

        let expected = (123_456_789_u64 << (WORKER_BITS + SEQUENCE_BITS))
            | (0xAB_u64 << SEQUENCE_BITS)
            | 0x7;
        assert_eq!(u64::from(id), expected);
    }

    #[test]
    fn fields_survive_u64_conversion() {
        let id = ShortId::new()
            .with_timestamp(MAX_TIMESTAMP)
            .with_worker_id(MAX_WORKER_ID)
            .with_sequence(MAX_SEQUENCE);

        let raw = u64::from(id);
        assert_eq!(raw, i64::MAX as u64);

        let back = ShortId::from(raw);
        assert_eq!(back.timestamp(), MAX_TIMESTAMP);
        assert_eq!(back.worker_id(), MAX_WORKER_ID);
        assert_eq!(back.sequence(), MAX_SEQUENCE);
    }

    #[test]
    fn ordering_follows_numeric_value() {
        let earlier = ShortId::new().with_timestamp(10).with_sequence(15);
        let later = ShortId::new().with_timestamp(11);
        assert!(earlier < later);

        let low_seq = ShortId::new().with_timestamp(10).with_sequence(1);
        assert!(low_seq < earlier);
    }

    #[test]
    fn bit_budgets() {
        assert_eq!(MAX_SEQUENCE, 15);
        assert_eq!(MAX_WORKER_ID, 255);
    }
}
