//! Text encoding for persisted binary values.
//!
//! Ciphertexts, IVs, salts and hashes are stored in text columns as standard
//! padded base64 (RFC 4648 §4) without line wrapping. Decoding strips ASCII
//! whitespace first, so values that were written line-wrapped still load.

use data_encoding::BASE64;

use crate::error::CryptoError;

/// Encode bytes as standard padded base64.
#[must_use]
pub fn encode(bytes: &[u8]) -> String {
    BASE64.encode(bytes)
}

/// Decode standard padded base64, ignoring ASCII whitespace.
///
/// # Errors
///
/// Returns `CryptoError::Format` if the input is not valid base64.
pub fn decode(text: &str) -> Result<Vec<u8>, CryptoError> {
    let compact: Vec<u8> = text
        .bytes()
        .filter(|b| !b.is_ascii_whitespace())
        .collect();
    BASE64
        .decode(&compact)
        .map_err(|e| CryptoError::Format(format!("invalid base64: {e}")))
}

/// Decode base64 into exactly `N` bytes.
///
/// # Errors
///
/// Returns `CryptoError::Format` if the input is not valid base64 or does
/// not decode to exactly `N` bytes.
pub fn decode_array<const N: usize>(text: &str, what: &str) -> Result<[u8; N], CryptoError> {
    let bytes = decode(text)?;
    <[u8; N]>::try_from(bytes.as_slice()).map_err(|_| {
        CryptoError::Format(format!(
            "{what} must be {N} bytes, got {} bytes",
            bytes.len()
        ))
    })
}
