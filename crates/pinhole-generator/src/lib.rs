pub mod short_url;

pub use short_url::{ShortUrlGenerator, CODE_TIMESTAMP_BITS};

use pinhole_core::ShortCodeBase58;

/// Trait for generating short codes.
///
/// Implementations are pure generators that don't interact with storage.
///
/// Generation is fallible: a distributed ID generator may refuse to mint an
/// ID (e.g. when the clock moves backwards) and callers decide whether to
/// retry.
pub trait Generator: Send + Sync + 'static {
    type Output: Into<ShortCodeBase58>;
    type Error: std::error::Error + Send + Sync + 'static;

    /// Generates a value that can be converted into a unique short code.
    fn generate(&self) -> Result<Self::Output, Self::Error>;
}
