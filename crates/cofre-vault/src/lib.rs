//! `cofre-vault`: vault business logic for Cofre.
//!
//! Owner registration and login, unlocked sessions, encrypted entry CRUD,
//! and storage through the [`EntryStore`] / [`CredentialStore`] traits
//! (in-memory or `SQLite`).

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod auth;
pub mod db;
pub mod entries;
pub mod error;
pub mod preferences;
pub mod session;
pub mod store;

pub use auth::{
    login, register, registration_state, set_biometric_enabled, AuthState, RegisterRequest,
    UserConfig, OWNER_ID,
};
pub use db::VaultDb;
pub use entries::{
    add_entry, delete_entry, get_entry, list_entries, reveal_password, search_entries,
    update_entry, NewEntry, VaultEntry,
};
pub use error::VaultError;
pub use preferences::Preferences;
pub use session::Session;
pub use store::{CredentialStore, EntryStore, MemoryStore, UNASSIGNED_ID};
