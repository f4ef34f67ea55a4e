//! Owner registration and master-password login.
//!
//! The vault has exactly one owner. Registration hashes the chosen master
//! password into a [`UserConfig`] record and opens a [`Session`]; login
//! verifies a candidate against that record and opens a [`Session`] on
//! success. Nothing here keeps the password: it lives only in the returned
//! session.
//!
//! The `biometric_enabled` flag is stored for the caller's UI but unlocks
//! nothing. A presence check does not supply the master password, so there
//! is no biometric login path.

use cofre_crypto_core::{CredentialRecord, CredentialVerifier};
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::preferences::Preferences;
use crate::session::Session;
use crate::store::CredentialStore;

/// The fixed id of the owner record.
pub const OWNER_ID: i64 = 1;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// The persisted owner record.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserConfig {
    /// Always [`OWNER_ID`].
    pub id: i64,
    /// Owner contact e-mail.
    pub email: String,
    /// `CredentialRecord::hash`.
    pub master_key_hash: String,
    /// `CredentialRecord::salt`.
    pub master_key_salt: String,
    /// Whether the owner asked for biometric prompts.
    pub biometric_enabled: bool,
}

impl UserConfig {
    /// The hash/salt pair to verify against.
    #[must_use]
    pub fn credential(&self) -> CredentialRecord {
        CredentialRecord {
            hash: self.master_key_hash.clone(),
            salt: self.master_key_salt.clone(),
        }
    }
}

/// Registration state, as seen before unlock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    /// No owner record: the next step is [`register`].
    Unregistered,
    /// Owner record present: the next step is [`login`].
    Registered {
        /// Stored biometric preference.
        biometric_enabled: bool,
    },
}

/// Parameters for owner registration.
pub struct RegisterRequest<'a> {
    /// Owner contact e-mail.
    pub email: &'a str,
    /// The chosen master password.
    pub password: &'a str,
    /// Initial biometric preference.
    pub enable_biometric: bool,
}

impl std::fmt::Debug for RegisterRequest<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RegisterRequest")
            .field("email", &self.email)
            .field("password", &"***")
            .field("enable_biometric", &self.enable_biometric)
            .finish()
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Report whether an owner is registered.
///
/// # Errors
///
/// Returns [`VaultError::Database`] on storage failure.
pub fn registration_state<S: CredentialStore + ?Sized>(store: &S) -> Result<AuthState, VaultError> {
    Ok(match store.fetch_credential()? {
        None => AuthState::Unregistered,
        Some(config) => AuthState::Registered {
            biometric_enabled: config.biometric_enabled,
        },
    })
}

/// Register the owner and open a session.
///
/// Any existing owner record is replaced. Entries encrypted under a
/// previous master password are not re-encrypted.
///
/// # Errors
///
/// - [`VaultError::WeakPassword`] if the password is shorter than
///   `prefs.min_master_password_length` characters
/// - [`VaultError::Crypto`] if hashing fails
/// - [`VaultError::Database`] on storage failure
pub fn register<S: CredentialStore + ?Sized>(
    store: &mut S,
    verifier: &CredentialVerifier,
    prefs: &Preferences,
    req: &RegisterRequest<'_>,
) -> Result<Session, VaultError> {
    let min_len = prefs.min_master_password_length;
    if req.password.chars().count() < min_len {
        return Err(VaultError::WeakPassword { min_len });
    }

    let record = verifier.register(req.password)?;
    let config = UserConfig {
        id: OWNER_ID,
        email: req.email.to_owned(),
        master_key_hash: record.hash,
        master_key_salt: record.salt,
        biometric_enabled: req.enable_biometric,
    };
    store.insert_credential(&config)?;
    tracing::info!(biometric = req.enable_biometric, "owner registered");

    Ok(Session::new(req.password, prefs.idle_timeout()))
}

/// Verify the master password and open a session.
///
/// # Errors
///
/// - [`VaultError::NotRegistered`] if no owner record exists
/// - [`VaultError::InvalidPassword`] if the password does not verify
/// - [`VaultError::Database`] on storage failure
pub fn login<S: CredentialStore + ?Sized>(
    store: &S,
    verifier: &CredentialVerifier,
    prefs: &Preferences,
    password: &str,
) -> Result<Session, VaultError> {
    let config = store.fetch_credential()?.ok_or(VaultError::NotRegistered)?;

    if !verifier.verify(password, &config.credential()) {
        tracing::warn!("login rejected: master password did not verify");
        return Err(VaultError::InvalidPassword);
    }

    tracing::info!("login succeeded");
    Ok(Session::new(password, prefs.idle_timeout()))
}

/// Persist the biometric preference flag.
///
/// # Errors
///
/// Returns [`VaultError::NotRegistered`] if no owner record exists.
pub fn set_biometric_enabled<S: CredentialStore + ?Sized>(
    store: &mut S,
    enabled: bool,
) -> Result<(), VaultError> {
    store.set_biometric_enabled(enabled)?;
    tracing::debug!(enabled, "biometric preference updated");
    Ok(())
}
