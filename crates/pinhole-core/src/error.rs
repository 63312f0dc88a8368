use thiserror::Error;

/// Errors related to the short code codec.
pub type Result<T> = std::result::Result<T, CoreError>;

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum CoreError {
    /// `index` is the byte offset of `character` in the input.
    #[error("invalid character {character:?} at index {index}")]
    InvalidCharacter { character: char, index: usize },
    #[error("malformed short code: {0}")]
    Malformed(String),
}
