use anyhow::Context;
use pinhole_core::{base58, ShortCodeBase58};
use pinhole_generator::{Generator, ShortUrlGenerator};
use pinhole_snowflake::Clock;
use std::io::Write;
use tracing::{info, warn};

/// Writes `count` fresh codes to `out`, one per line.
pub fn generate<G: Generator>(
    generator: &G,
    count: usize,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    for n in 0..count {
        let code: ShortCodeBase58 = generator
            .generate()
            .with_context(|| format!("failed to generate short code {} of {count}", n + 1))?
            .into();
        writeln!(out, "{code}")?;
    }
    info!(count, "generated short codes");
    Ok(())
}

/// Writes `<code>\tvalid|invalid` per code. Returns whether all were valid.
pub fn validate<C: Clock>(
    generator: &ShortUrlGenerator<C>,
    codes: &[String],
    out: &mut impl Write,
) -> anyhow::Result<bool> {
    let mut all_valid = true;
    for code in codes {
        let valid = generator.is_valid_short_url(code);
        all_valid &= valid;
        writeln!(out, "{code}\t{}", if valid { "valid" } else { "invalid" })?;
    }
    Ok(all_valid)
}

/// Writes `<code>\t<value>` per decodable code and logs the rest. Returns
/// whether every code decoded.
pub fn decode(codes: &[String], out: &mut impl Write) -> anyhow::Result<bool> {
    let mut all_decoded = true;
    for code in codes {
        match base58::decode(code) {
            Ok(value) => writeln!(out, "{code}\t{value}")?,
            Err(err) => {
                warn!(code = %code, error = %err, "cannot decode short code");
                all_decoded = false;
            }
        }
    }
    Ok(all_decoded)
}

/// Whether the failure is transient and the same command may succeed later.
pub fn is_retryable(err: &anyhow::Error) -> bool {
    err.downcast_ref::<pinhole_snowflake::Error>()
        .is_some_and(pinhole_snowflake::Error::is_retryable)
}
