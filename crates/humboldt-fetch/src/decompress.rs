//! LZMA decompression of bi5 bodies into raw record bytes.
//!
//! Empty bodies never reach this module: the fetch loop classifies
//! 404s and empty 200s as data gaps before decompressing, so the only
//! question answered here is whether a non-empty body is a valid LZMA
//! stream. Cache hits also bypass this module entirely (cached content
//! is already decompressed).

use std::io::{BufReader, Cursor};

use lzma_rs::lzma_decompress;
use thiserror::Error;

/// Failure to decompress a bi5 body.
///
/// A corrupt body and a truncated transfer are indistinguishable at
/// this layer; the fetch loop treats both as retryable.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("not a valid LZMA stream: {reason}")]
pub struct DecompressError {
    reason: String,
}

/// Decompresses a bi5 body into the raw record bytes the parsers
/// consume (20-byte tick or 24-byte bar records).
///
/// # Errors
///
/// Returns a [`DecompressError`] if the body is not a complete LZMA
/// stream.
pub fn decompress_bi5(body: &[u8]) -> Result<Vec<u8>, DecompressError> {
    // bi5 bodies typically expand four to five times
    let mut records = Vec::with_capacity(body.len().saturating_mul(4));
    let mut reader = BufReader::new(Cursor::new(body));

    lzma_decompress(&mut reader, &mut records).map_err(|e| DecompressError {
        reason: e.to_string(),
    })?;

    Ok(records)
}
