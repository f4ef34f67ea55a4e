//! Master-password registration and verification.
//!
//! The master password is never stored. Registration produces a
//! [`CredentialRecord`] (a random salt and the Argon2id hash of the password
//! under that salt, both base64) which the storage layer persists. Login
//! recomputes the hash with the stored salt and compares in constant time.
//!
//! The work-factor parameters are not part of the record: they are fixed by
//! [`CREDENTIAL_PARAMS`]. A verifier built with different parameters will not
//! verify records produced under the defaults.

use crate::compare::constant_time_eq;
use crate::encoding;
use crate::error::CryptoError;
use crate::kdf::{self, Argon2idParams};
use crate::memory::SecretBytes;
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};

/// Salt length in bytes (128 bits).
pub const SALT_LEN: usize = 16;

/// Password hash length in bytes (256 bits).
pub const HASH_LEN: usize = kdf::OUTPUT_LEN;

/// Argon2id parameters used for every credential record.
///
/// 19 MiB, 2 passes, 1 lane: tens of milliseconds per hash on current
/// hardware. Callers on a UI thread must run hashing in the background.
pub const CREDENTIAL_PARAMS: Argon2idParams = Argon2idParams {
    m_cost: 19_456,
    t_cost: 2,
    p_cost: 1,
};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Random per-registration salt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Salt([u8; SALT_LEN]);

impl Salt {
    /// Wrap raw salt bytes.
    #[must_use]
    pub const fn from_bytes(bytes: [u8; SALT_LEN]) -> Self {
        Self(bytes)
    }

    /// Raw salt bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; SALT_LEN] {
        &self.0
    }

    /// Base64 form, as persisted.
    #[must_use]
    pub fn encode(&self) -> String {
        encoding::encode(&self.0)
    }

    /// Parse the persisted base64 form.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if the text is not base64 of exactly
    /// [`SALT_LEN`] bytes.
    pub fn decode(text: &str) -> Result<Self, CryptoError> {
        encoding::decode_array::<SALT_LEN>(text, "salt").map(Self)
    }
}

/// Persisted master-password credential: `{hash, salt}`, both base64.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CredentialRecord {
    /// `base64(argon2id(password, salt))`.
    pub hash: String,
    /// `base64(salt)`.
    pub salt: String,
}

/// Hashes and verifies the master password.
///
/// Holds only the Argon2id parameters; every call is independent.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CredentialVerifier {
    params: Argon2idParams,
}

impl Default for CredentialVerifier {
    fn default() -> Self {
        Self::with_params(CREDENTIAL_PARAMS)
    }
}

impl CredentialVerifier {
    /// Verifier with explicit Argon2id parameters.
    ///
    /// Records must be verified with the parameters they were created with.
    #[must_use]
    pub const fn with_params(params: Argon2idParams) -> Self {
        Self { params }
    }

    /// The Argon2id parameters this verifier hashes with.
    #[must_use]
    pub const fn params(&self) -> &Argon2idParams {
        &self.params
    }

    /// Generate a fresh random salt from the OS CSPRNG.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if the CSPRNG fails.
    pub fn generate_salt() -> Result<Salt, CryptoError> {
        let mut bytes = [0u8; SALT_LEN];
        OsRng
            .try_fill_bytes(&mut bytes)
            .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
        Ok(Salt(bytes))
    }

    /// Hash `password` under `salt`. Deterministic for identical inputs.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::KeyDerivation` if the parameters are invalid.
    pub fn hash_password(
        &self,
        password: &str,
        salt: &Salt,
    ) -> Result<SecretBytes<HASH_LEN>, CryptoError> {
        kdf::derive(password.as_bytes(), salt.as_bytes(), &self.params)
    }

    /// Create the credential record for a new master password.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::SecureMemory` if salt generation fails, or
    /// `CryptoError::KeyDerivation` if hashing fails.
    pub fn register(&self, password: &str) -> Result<CredentialRecord, CryptoError> {
        let salt = Self::generate_salt()?;
        let hash = self.hash_password(password, &salt)?;
        Ok(CredentialRecord {
            hash: encoding::encode(hash.expose()),
            salt: salt.encode(),
        })
    }

    /// Check `candidate` against a stored record.
    ///
    /// Returns `true` only on an exact hash match. Malformed records and
    /// derivation failures return `false`.
    #[must_use]
    pub fn verify(&self, candidate: &str, stored: &CredentialRecord) -> bool {
        let Ok(salt) = Salt::decode(&stored.salt) else {
            return false;
        };
        let Ok(expected) = encoding::decode(&stored.hash) else {
            return false;
        };
        let Ok(actual) = self.hash_password(candidate, &salt) else {
            return false;
        };
        constant_time_eq(actual.expose(), &expected)
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
