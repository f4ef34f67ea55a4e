//! `SQLite` database connection, migration runner, and the persistent
//! [`EntryStore`] / [`CredentialStore`] implementation.
//!
//! The database holds ciphertext and the credential hash only. Titles and
//! usernames are stored in plaintext so they can be listed before any
//! password is revealed.

use std::fmt;
use std::path::Path;

use rusqlite::{params, Connection, OptionalExtension, Row};

use crate::auth::{UserConfig, OWNER_ID};
use crate::entries::VaultEntry;
use crate::error::VaultError;
use crate::store::{CredentialStore, EntryStore, UNASSIGNED_ID};

// ---------------------------------------------------------------------------
// Embedded migrations
// ---------------------------------------------------------------------------

/// Forward-only SQL migrations, embedded at compile time.
/// Index 0 → version 1, index 1 → version 2, etc.
const MIGRATIONS: &[&str] = &[include_str!("../migrations/001_initial_schema.sql")];

const ENTRY_COLUMNS: &str =
    "id, service_title, username, encrypted_password_base64, iv_base64";

// ---------------------------------------------------------------------------
// VaultDb
// ---------------------------------------------------------------------------

/// Handle to an open, migrated vault database.
pub struct VaultDb {
    conn: Connection,
}

impl fmt::Debug for VaultDb {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("VaultDb(***)")
    }
}

impl VaultDb {
    /// Open (or create) the vault database at `path`.
    ///
    /// Enables WAL journal mode and runs any pending migrations.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Database`] if the file cannot be opened.
    /// - [`VaultError::Migration`] if a migration fails.
    pub fn open(path: &Path) -> Result<Self, VaultError> {
        let conn = Connection::open(path)?;
        let _mode: String =
            conn.pragma_update_and_check(None, "journal_mode", "WAL", |row| row.get(0))?;
        let mut db = Self { conn };
        db.run_migrations()?;
        tracing::debug!(path = %path.display(), "vault database opened");
        Ok(db)
    }

    /// Open a fresh database that lives only as long as the handle.
    ///
    /// # Errors
    ///
    /// - [`VaultError::Database`] if `SQLite` cannot allocate it.
    /// - [`VaultError::Migration`] if a migration fails.
    pub fn open_in_memory() -> Result<Self, VaultError> {
        let mut db = Self {
            conn: Connection::open_in_memory()?,
        };
        db.run_migrations()?;
        Ok(db)
    }

    /// Returns the current schema version (`PRAGMA user_version`).
    ///
    /// # Errors
    ///
    /// Returns [`VaultError::Database`] if the pragma query fails.
    pub fn schema_version(&self) -> Result<i32, VaultError> {
        let v: i32 = self
            .conn
            .pragma_query_value(None, "user_version", |row| row.get(0))?;
        Ok(v)
    }

    // -----------------------------------------------------------------------
    // Migration runner
    // -----------------------------------------------------------------------

    /// Apply all pending migrations sequentially.
    ///
    /// Each migration is wrapped in a transaction. The `user_version` pragma
    /// is bumped atomically on commit.
    fn run_migrations(&mut self) -> Result<(), VaultError> {
        let current = self.schema_version()?;

        for (idx, sql) in MIGRATIONS.iter().enumerate() {
            let version = idx
                .checked_add(1)
                .and_then(|v| i32::try_from(v).ok())
                .ok_or_else(|| VaultError::Migration("migration index overflow".into()))?;

            if version <= current {
                continue;
            }

            let tx = self.conn.transaction().map_err(|e| {
                VaultError::Migration(format!(
                    "failed to start transaction for migration {version}: {e}"
                ))
            })?;

            tx.execute_batch(sql)
                .map_err(|e| VaultError::Migration(format!("migration {version} failed: {e}")))?;

            tx.pragma_update(None, "user_version", version)
                .map_err(|e| {
                    VaultError::Migration(format!(
                        "failed to update user_version to {version}: {e}"
                    ))
                })?;

            tx.commit().map_err(|e| {
                VaultError::Migration(format!("failed to commit migration {version}: {e}"))
            })?;

            tracing::info!(version, "applied schema migration");
        }

        Ok(())
    }
}

fn entry_from_row(row: &Row<'_>) -> rusqlite::Result<VaultEntry> {
    Ok(VaultEntry {
        id: row.get(0)?,
        service_title: row.get(1)?,
        username: row.get(2)?,
        encrypted_password_base64: row.get(3)?,
        iv_base64: row.get(4)?,
    })
}

// ---------------------------------------------------------------------------
// Store implementations
// ---------------------------------------------------------------------------

impl EntryStore for VaultDb {
    fn fetch_all(&self) -> Result<Vec<VaultEntry>, VaultError> {
        let mut stmt = self.conn.prepare(&format!(
            "SELECT {ENTRY_COLUMNS} FROM passwords ORDER BY service_title COLLATE NOCASE, id"
        ))?;
        let rows = stmt.query_map([], entry_from_row)?;
        Ok(rows.collect::<Result<Vec<_>, _>>()?)
    }

    fn fetch_by_id(&self, id: i64) -> Result<Option<VaultEntry>, VaultError> {
        Ok(self
            .conn
            .query_row(
                &format!("SELECT {ENTRY_COLUMNS} FROM passwords WHERE id = ?1"),
                params![id],
                entry_from_row,
            )
            .optional()?)
    }

    fn insert_or_replace(&mut self, entry: &VaultEntry) -> Result<i64, VaultError> {
        // NULL lets AUTOINCREMENT pick the id.
        let id = (entry.id != UNASSIGNED_ID).then_some(entry.id);
        self.conn.execute(
            &format!(
                "INSERT OR REPLACE INTO passwords ({ENTRY_COLUMNS}) \
                 VALUES (?1, ?2, ?3, ?4, ?5)"
            ),
            params![
                id,
                entry.service_title,
                entry.username,
                entry.encrypted_password_base64,
                entry.iv_base64,
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    fn update(&mut self, entry: &VaultEntry) -> Result<(), VaultError> {
        let changed = self.conn.execute(
            "UPDATE passwords SET service_title = ?2, username = ?3, \
             encrypted_password_base64 = ?4, iv_base64 = ?5 WHERE id = ?1",
            params![
                entry.id,
                entry.service_title,
                entry.username,
                entry.encrypted_password_base64,
                entry.iv_base64,
            ],
        )?;
        if changed == 0 {
            return Err(VaultError::EntryNotFound(entry.id));
        }
        Ok(())
    }

    fn delete(&mut self, id: i64) -> Result<bool, VaultError> {
        let removed = self
            .conn
            .execute("DELETE FROM passwords WHERE id = ?1", params![id])?;
        Ok(removed > 0)
    }
}

impl CredentialStore for VaultDb {
    fn fetch_credential(&self) -> Result<Option<UserConfig>, VaultError> {
        Ok(self
            .conn
            .query_row(
                "SELECT id, email, master_key_hash, master_key_salt, biometric_enabled \
                 FROM user_config WHERE id = ?1",
                params![OWNER_ID],
                |row| {
                    Ok(UserConfig {
                        id: row.get(0)?,
                        email: row.get(1)?,
                        master_key_hash: row.get(2)?,
                        master_key_salt: row.get(3)?,
                        biometric_enabled: row.get(4)?,
                    })
                },
            )
            .optional()?)
    }

    fn insert_credential(&mut self, config: &UserConfig) -> Result<(), VaultError> {
        self.conn.execute(
            "INSERT OR REPLACE INTO user_config \
             (id, email, master_key_hash, master_key_salt, biometric_enabled) \
             VALUES (?1, ?2, ?3, ?4, ?5)",
            params![
                OWNER_ID,
                config.email,
                config.master_key_hash,
                config.master_key_salt,
                config.biometric_enabled,
            ],
        )?;
        Ok(())
    }

    fn set_biometric_enabled(&mut self, enabled: bool) -> Result<(), VaultError> {
        let changed = self.conn.execute(
            "UPDATE user_config SET biometric_enabled = ?1 WHERE id = ?2",
            params![enabled, OWNER_ID],
        )?;
        if changed == 0 {
            return Err(VaultError::NotRegistered);
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
