//! Vault error types for `cofre-vault`.

use cofre_crypto_core::CryptoError;
use thiserror::Error;

/// Errors produced by vault operations.
#[derive(Debug, Error)]
pub enum VaultError {
    /// Cryptographic operation failed (delegated from crypto-core).
    #[error(transparent)]
    Crypto(#[from] CryptoError),

    /// The candidate master password does not match the stored credential.
    #[error("invalid password")]
    InvalidPassword,

    /// No credential record exists yet; the owner must register first.
    #[error("no master password registered")]
    NotRegistered,

    /// Master password shorter than the configured minimum.
    #[error("master password must be at least {min_len} characters")]
    WeakPassword {
        /// Minimum accepted length in characters.
        min_len: usize,
    },

    /// Entry fields rejected before encryption (blank title or password).
    #[error("invalid entry: {0}")]
    InvalidEntry(String),

    /// Entry not found by ID.
    #[error("entry not found: {0}")]
    EntryNotFound(i64),

    /// `SQLite` database error.
    #[error("database error: {0}")]
    Database(String),

    /// Migration error during schema upgrade.
    #[error("migration error: {0}")]
    Migration(String),

    /// I/O error from the filesystem.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl From<rusqlite::Error> for VaultError {
    fn from(err: rusqlite::Error) -> Self {
        Self::Database(err.to_string())
    }
}
