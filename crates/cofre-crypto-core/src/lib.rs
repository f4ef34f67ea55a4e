//! `cofre-crypto-core`: cryptographic core of the Cofre password vault.
//!
//! Two independent, stateless components:
//! - [`symmetric`]: master-password key derivation and per-record
//!   AES-256-GCM encryption of stored secrets
//! - [`credential`]: salted Argon2id hashing and verification of the
//!   master password itself
//!
//! Nothing in this crate keeps state between calls, touches the network or
//! the filesystem, or logs. All material is passed in per call.

#![cfg_attr(test, allow(clippy::unwrap_used, clippy::arithmetic_side_effects))]

pub mod compare;
pub mod encoding;
pub mod error;
pub mod memory;

pub mod kdf;

pub mod symmetric;

pub mod credential;

pub use compare::constant_time_eq;
pub use credential::{
    CredentialRecord, CredentialVerifier, Salt, CREDENTIAL_PARAMS, HASH_LEN, SALT_LEN,
};
pub use error::CryptoError;
pub use kdf::{derive, Argon2idParams};
pub use memory::{SecretBuffer, SecretBytes};
pub use symmetric::{decrypt, derive_key, encrypt, EncryptedRecord, SealedData};
