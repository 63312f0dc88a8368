use crate::error::{CoreError, Result};
use pinhole_snowflake::ShortId;
use serde::{Deserialize, Serialize};
use smol_str::SmolStr;
use std::fmt::Display;
use std::str::FromStr;

/// Symbols in digit order (the Flickr base58 alphabet).
///
/// Upper- and lower-case letters are distinct digits; `0`, `O`, `I` and `l`
/// are left out because they are easily confused.
pub const ALPHABET: &str = "123456789abcdefghijkmnopqrstuvwxyzABCDEFGHJKLMNPQRSTUVWXYZ";
/// Length of every encoded short code.
pub const CODE_WIDTH: usize = 7;
/// Number of distinct codes, `58^7`. Values at or above it lose their high
/// digits when encoded.
pub const CODE_SPACE: u64 = 58_u64.pow(CODE_WIDTH as u32);

const DIGITS: &bs58::Alphabet = bs58::Alphabet::FLICKR;

/// Encodes `value` as exactly [`CODE_WIDTH`] base58 digits.
///
/// Short results are left-padded with the zero digit `'1'`. Longer results
/// keep only the least significant digits, i.e. the code of
/// `value % CODE_SPACE`.
pub fn encode(value: u64) -> String {
    // bs58 writes each leading zero byte as a zero digit; strip them to get a
    // plain positional number.
    let bytes = value.to_be_bytes();
    let significant = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let digits = bs58::encode(&bytes[significant..])
        .with_alphabet(DIGITS)
        .into_string();

    if digits.len() > CODE_WIDTH {
        return digits[digits.len() - CODE_WIDTH..].to_owned();
    }
    format!("{:1>width$}", digits, width = CODE_WIDTH)
}

/// Decodes a base58 string of any length into its numeric value.
///
/// Input longer than a `u64` can hold wraps modulo `2^64`. The empty string
/// decodes to zero.
pub fn decode(code: &str) -> Result<u64> {
    let bytes = bs58::decode(code)
        .with_alphabet(DIGITS)
        .into_vec()
        .map_err(|err| match err {
            bs58::decode::Error::InvalidCharacter { character, index } => {
                CoreError::InvalidCharacter { character, index }
            }
            bs58::decode::Error::NonAsciiCharacter { index } => CoreError::InvalidCharacter {
                character: code
                    .get(index..)
                    .and_then(|rest| rest.chars().next())
                    .unwrap_or(char::REPLACEMENT_CHARACTER),
                index,
            },
            other => CoreError::Malformed(other.to_string()),
        })?;

    // Keep the low 64 bits of the big-endian number.
    let tail = &bytes[bytes.len().saturating_sub(8)..];
    let mut word = [0_u8; 8];
    word[8 - tail.len()..].copy_from_slice(tail);
    Ok(u64::from_be_bytes(word))
}

/// Returns `true` if every character of `code` belongs to [`ALPHABET`].
pub fn is_valid(code: &str) -> bool {
    decode(code).is_ok()
}

/// A short code encoded as base58 string.
///
/// Codes built from a number are always [`CODE_WIDTH`] characters long;
/// parsed codes may have any length as long as every character is a base58
/// digit.
#[derive(Clone, PartialEq, Eq, Hash)]
pub struct ShortCodeBase58 {
    code: SmolStr,
    value: u64,
}

impl ShortCodeBase58 {
    /// Creates a fixed-width code for `value`.
    pub fn new(value: u64) -> Self {
        Self {
            code: SmolStr::new(encode(value)),
            value: value % CODE_SPACE,
        }
    }

    /// Validates `code` against the alphabet.
    pub fn parse(code: impl AsRef<str>) -> Result<Self> {
        let code = code.as_ref();
        let value = decode(code)?;
        Ok(Self {
            code: SmolStr::new(code),
            value,
        })
    }

    /// Returns the short code as a string slice.
    pub fn as_str(&self) -> &str {
        &self.code
    }

    /// The numeric value the digits spell out.
    pub fn value(&self) -> u64 {
        self.value
    }
}

impl std::fmt::Debug for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_tuple("ShortCodeBase58").field(&self.code).finish()
    }
}

impl Display for ShortCodeBase58 {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.code)
    }
}

impl FromStr for ShortCodeBase58 {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse(s)
    }
}

impl Serialize for ShortCodeBase58 {
    fn serialize<S>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        self.code.serialize(serializer)
    }
}

impl<'de> Deserialize<'de> for ShortCodeBase58 {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = SmolStr::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

impl From<u64> for ShortCodeBase58 {
    fn from(value: u64) -> Self {
        Self::new(value)
    }
}

impl From<ShortId> for ShortCodeBase58 {
    fn from(id: ShortId) -> Self {
        Self::new(id.into())
    }
}
