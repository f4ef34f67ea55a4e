//! Entry CRUD operations for the vault.
//!
//! An entry is a service title, a username, and a password encrypted under
//! the session's master password. Title and username stay in plaintext for
//! listing and search; only the password is encrypted. Every write of a
//! password produces a fresh [`EncryptedRecord`] with a new IV.

use cofre_crypto_core::symmetric::{self, EncryptedRecord};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};

use crate::error::VaultError;
use crate::session::Session;
use crate::store::{EntryStore, UNASSIGNED_ID};

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// A stored vault entry, in its persisted shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VaultEntry {
    /// Store-assigned identifier ([`UNASSIGNED_ID`] before insertion).
    pub id: i64,
    /// Display name of the service (e.g. "GitHub").
    pub service_title: String,
    /// Account name at the service. May be empty.
    pub username: String,
    /// `EncryptedRecord::ciphertext`.
    pub encrypted_password_base64: String,
    /// `EncryptedRecord::iv`.
    pub iv_base64: String,
}

impl VaultEntry {
    fn from_record(id: i64, params: &NewEntry<'_>, record: EncryptedRecord) -> Self {
        Self {
            id,
            service_title: params.service_title.to_owned(),
            username: params.username.to_owned(),
            encrypted_password_base64: record.ciphertext,
            iv_base64: record.iv,
        }
    }
}

/// Plaintext fields for creating or replacing an entry.
#[derive(Clone, Copy)]
pub struct NewEntry<'a> {
    /// Service title; must not be blank.
    pub service_title: &'a str,
    /// Username; may be empty.
    pub username: &'a str,
    /// Plaintext password; must not be blank.
    pub password: &'a str,
}

impl std::fmt::Debug for NewEntry<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NewEntry")
            .field("service_title", &self.service_title)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl NewEntry<'_> {
    fn validate(&self) -> Result<(), VaultError> {
        if self.service_title.trim().is_empty() {
            return Err(VaultError::InvalidEntry("service title is blank".into()));
        }
        if self.password.trim().is_empty() {
            return Err(VaultError::InvalidEntry("password is blank".into()));
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Operations
// ---------------------------------------------------------------------------

/// Encrypt and store a new entry.
///
/// # Errors
///
/// - [`VaultError::InvalidEntry`] if the title or password is blank
/// - [`VaultError::Crypto`] if encryption fails
/// - [`VaultError::Database`] on storage failure
pub fn add_entry<S: EntryStore + ?Sized>(
    store: &mut S,
    session: &Session,
    params: &NewEntry<'_>,
) -> Result<VaultEntry, VaultError> {
    params.validate()?;
    let record = symmetric::encrypt(params.password, session.master_password())?;
    let mut entry = VaultEntry::from_record(UNASSIGNED_ID, params, record);
    entry.id = store.insert_or_replace(&entry)?;
    tracing::debug!(entry_id = entry.id, "entry added");
    Ok(entry)
}

/// Replace an existing entry's fields, re-encrypting the password under a
/// new IV.
///
/// # Errors
///
/// - [`VaultError::EntryNotFound`] if `id` does not exist
/// - [`VaultError::InvalidEntry`] if the title or password is blank
/// - [`VaultError::Crypto`] if encryption fails
pub fn update_entry<S: EntryStore + ?Sized>(
    store: &mut S,
    session: &Session,
    id: i64,
    params: &NewEntry<'_>,
) -> Result<VaultEntry, VaultError> {
    params.validate()?;
    if store.fetch_by_id(id)?.is_none() {
        return Err(VaultError::EntryNotFound(id));
    }
    let record = symmetric::encrypt(params.password, session.master_password())?;
    let entry = VaultEntry::from_record(id, params, record);
    store.update(&entry)?;
    tracing::debug!(entry_id = id, "entry updated");
    Ok(entry)
}

/// Delete an entry. Returns whether it existed.
///
/// # Errors
///
/// Returns [`VaultError::Database`] on storage failure.
pub fn delete_entry<S: EntryStore + ?Sized>(store: &mut S, id: i64) -> Result<bool, VaultError> {
    let removed = store.delete(id)?;
    tracing::debug!(entry_id = id, removed, "entry deleted");
    Ok(removed)
}

/// Fetch one entry.
///
/// # Errors
///
/// Returns [`VaultError::EntryNotFound`] if `id` does not exist.
pub fn get_entry<S: EntryStore + ?Sized>(store: &S, id: i64) -> Result<VaultEntry, VaultError> {
    store.fetch_by_id(id)?.ok_or(VaultError::EntryNotFound(id))
}

/// All entries, ordered by service title.
///
/// # Errors
///
/// Returns [`VaultError::Database`] on storage failure.
pub fn list_entries<S: EntryStore + ?Sized>(store: &S) -> Result<Vec<VaultEntry>, VaultError> {
    store.fetch_all()
}

/// Entries whose service title or username contains `query`,
/// case-insensitively. A blank query returns every entry.
///
/// # Errors
///
/// Returns [`VaultError::Database`] on storage failure.
pub fn search_entries<S: EntryStore + ?Sized>(
    store: &S,
    query: &str,
) -> Result<Vec<VaultEntry>, VaultError> {
    let all = store.fetch_all()?;
    if query.trim().is_empty() {
        return Ok(all);
    }
    let needle = query.to_lowercase();
    Ok(all
        .into_iter()
        .filter(|e| {
            e.service_title.to_lowercase().contains(&needle)
                || e.username.to_lowercase().contains(&needle)
        })
        .collect())
}

/// Decrypt an entry's password under the session's master password.
///
/// # Errors
///
/// Returns [`VaultError::Crypto`] with `CryptoError::Decryption` or
/// `CryptoError::Encoding` if the record does not open under this session,
/// or `CryptoError::Format` if the stored values are malformed.
pub fn reveal_password(session: &Session, entry: &VaultEntry) -> Result<SecretString, VaultError> {
    let plain = symmetric::decrypt(
        &entry.encrypted_password_base64,
        &entry.iv_base64,
        session.master_password(),
    )
    .inspect_err(|e| {
        if e.is_authentication_failure() {
            tracing::warn!(entry_id = entry.id, "entry did not decrypt under session key");
        }
    })?;
    Ok(plain)
}
