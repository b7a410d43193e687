//! Audio delivery pipeline
//!
//! Turns the inline base64 PCM payload returned by the speech endpoint into
//! a self-contained playable WAV buffer (see `wav.rs`). Everything here is
//! pure and reentrant.

mod wav;

pub use wav::{HEADER_LEN, WavHeader, pcm_to_wav};

use base64::Engine;

use crate::{Error, Result};

/// Decode a standard-alphabet base64 string into raw bytes.
///
/// Strict: characters outside the alphabet or invalid padding fail with
/// [`Error::Decode`] rather than returning partial bytes.
///
/// # Errors
///
/// Returns [`Error::Decode`] for malformed input.
pub fn decode_base64(input: &str) -> Result<Vec<u8>> {
    Ok(base64::engine::general_purpose::STANDARD.decode(input)?)
}

/// Reinterpret raw little-endian 16-bit PCM bytes as signed samples.
///
/// The speech endpoint delivers `audio/L16` data as a byte stream; sample
/// boundaries are every two bytes.
///
/// # Errors
///
/// Returns [`Error::InvalidSample`] if the payload has an odd byte count.
pub fn pcm_from_bytes(bytes: &[u8]) -> Result<Vec<i16>> {
    if bytes.len() % 2 != 0 {
        return Err(Error::InvalidSample(format!(
            "PCM payload has odd length {}",
            bytes.len()
        )));
    }

    Ok(bytes
        .chunks_exact(2)
        .map(|pair| i16::from_le_bytes([pair[0], pair[1]]))
        .collect())
}
