//! Storage collaborator interfaces and the in-memory implementation.
//!
//! The vault layer only ever hands ciphertext to a store; stores never see
//! plaintext secrets or the master password. [`crate::db::VaultDb`] is the
//! persistent implementation.

use std::collections::BTreeMap;

use crate::auth::UserConfig;
use crate::entries::VaultEntry;
use crate::error::VaultError;

/// Entry id meaning "not stored yet": [`EntryStore::insert_or_replace`]
/// assigns a fresh id to entries carrying it.
pub const UNASSIGNED_ID: i64 = 0;

/// Persistence for vault entries.
pub trait EntryStore {
    /// All entries, ordered by service title (ASCII case-insensitive), then id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn fetch_all(&self) -> Result<Vec<VaultEntry>, VaultError>;

    /// The entry with `id`, if any.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn fetch_by_id(&self, id: i64) -> Result<Option<VaultEntry>, VaultError>;

    /// Store `entry`, replacing any entry with the same id. An entry with
    /// [`UNASSIGNED_ID`] gets a fresh id. Returns the stored id.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn insert_or_replace(&mut self, entry: &VaultEntry) -> Result<i64, VaultError>;

    /// Overwrite an existing entry.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::EntryNotFound`] if no entry has `entry.id`.
    fn update(&mut self, entry: &VaultEntry) -> Result<(), VaultError>;

    /// Remove the entry with `id`. Returns whether an entry was removed.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn delete(&mut self, id: i64) -> Result<bool, VaultError>;
}

/// Persistence for the single owner credential record.
pub trait CredentialStore {
    /// The stored owner record, if registered.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn fetch_credential(&self) -> Result<Option<UserConfig>, VaultError>;

    /// Insert the owner record, replacing any previous one.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] on storage failure.
    fn insert_credential(&mut self, config: &UserConfig) -> Result<(), VaultError>;

    /// Persist the biometric-unlock preference flag.
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::NotRegistered`] if there is no owner record.
    fn set_biometric_enabled(&mut self, enabled: bool) -> Result<(), VaultError>;
}

/// Volatile store; contents are lost when it is dropped.
#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: BTreeMap<i64, VaultEntry>,
    last_id: i64,
    owner: Option<UserConfig>,
}

impl MemoryStore {
    /// Empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn next_id(&mut self) -> Result<i64, VaultError> {
        let id = self
            .last_id
            .checked_add(1)
            .ok_or_else(|| VaultError::Database("entry id space exhausted".into()))?;
        self.last_id = id;
        Ok(id)
    }
}

impl EntryStore for MemoryStore {
    fn fetch_all(&self) -> Result<Vec<VaultEntry>, VaultError> {
        let mut all: Vec<VaultEntry> = self.entries.values().cloned().collect();
        all.sort_by(|a, b| {
            a.service_title
                .to_ascii_lowercase()
                .cmp(&b.service_title.to_ascii_lowercase())
                .then(a.id.cmp(&b.id))
        });
        Ok(all)
    }

    fn fetch_by_id(&self, id: i64) -> Result<Option<VaultEntry>, VaultError> {
        Ok(self.entries.get(&id).cloned())
    }

    fn insert_or_replace(&mut self, entry: &VaultEntry) -> Result<i64, VaultError> {
        let id = if entry.id == UNASSIGNED_ID {
            self.next_id()?
        } else {
            self.last_id = self.last_id.max(entry.id);
            entry.id
        };
        let mut stored = entry.clone();
        stored.id = id;
        self.entries.insert(id, stored);
        Ok(id)
    }

    fn update(&mut self, entry: &VaultEntry) -> Result<(), VaultError> {
        let slot = self
            .entries
            .get_mut(&entry.id)
            .ok_or(VaultError::EntryNotFound(entry.id))?;
        slot.clone_from(entry);
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<bool, VaultError> {
        Ok(self.entries.remove(&id).is_some())
    }
}

impl CredentialStore for MemoryStore {
    fn fetch_credential(&self) -> Result<Option<UserConfig>, VaultError> {
        Ok(self.owner.clone())
    }

    fn insert_credential(&mut self, config: &UserConfig) -> Result<(), VaultError> {
        self.owner = Some(config.clone());
        Ok(())
    }

    fn set_biometric_enabled(&mut self, enabled: bool) -> Result<(), VaultError> {
        let owner = self.owner.as_mut().ok_or(VaultError::NotRegistered)?;
        owner.biometric_enabled = enabled;
        Ok(())
    }
}
