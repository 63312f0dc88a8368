//! Short code types for the Pinhole generator.
//!
//! Codes are fixed-width base58 strings over an alphabet without visually
//! ambiguous characters. Encoding is pure and needs no synchronization.

pub mod base58;
pub mod error;

pub use base58::{decode, encode, is_valid, ShortCodeBase58, ALPHABET, CODE_SPACE, CODE_WIDTH};
pub use error::{CoreError, Result};
