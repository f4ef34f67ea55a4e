//! Cryptographic error types for `cofre-crypto-core`.

use thiserror::Error;

/// Errors produced by cryptographic operations.
///
/// [`CryptoError::Decryption`] and [`CryptoError::Encoding`] render the same
/// message: a wrong master password and corrupted data are not told apart.
#[derive(Debug, Error)]
pub enum CryptoError {
    /// Encoded input (base64 ciphertext, IV, salt or hash) is malformed.
    #[error("format error: {0}")]
    Format(String),

    /// Authentication tag verification failed: wrong key or tampered data.
    #[error("decryption failed: wrong master password or corrupted data")]
    Decryption,

    /// Decrypted bytes are not valid UTF-8.
    #[error("decryption failed: wrong master password or corrupted data")]
    Encoding,

    /// Symmetric encryption failure (AES-256-GCM key setup or sealing).
    #[error("encryption error: {0}")]
    Encryption(String),

    /// Key derivation failed (Argon2id parameter validation, memory allocation).
    #[error("key derivation failed: {0}")]
    KeyDerivation(String),

    /// CSPRNG failure while producing salts, nonces or random buffers.
    #[error("secure memory error: {0}")]
    SecureMemory(String),
}

impl CryptoError {
    /// Returns `true` for the outcomes a caller should surface as
    /// "incorrect master password or corrupted data".
    #[must_use]
    pub const fn is_authentication_failure(&self) -> bool {
        matches!(self, Self::Decryption | Self::Encoding)
    }
}
