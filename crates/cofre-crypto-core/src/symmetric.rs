//! Master-password record encryption (AES-256-GCM).
//!
//! This module provides:
//! - [`derive_key`]: deterministic 256-bit key from the master password
//! - [`encrypt`] / [`decrypt`]: string secret ↔ base64 [`EncryptedRecord`]
//! - [`seal`] / [`open`]: the underlying AEAD primitives over raw bytes
//! - [`SealedData`]: the decoded nonce, ciphertext and tag of a record
//!
//! # Key derivation
//!
//! The record key is SHA-256 of the master password with no salt. It must be
//! reconstructible from the password alone because it is never stored. A
//! fast digest offers no brute-force resistance on its own; the slow,
//! salted hash in [`crate::credential`] is what guards the master password.
//!
//! # Record layout
//!
//! Each record is encrypted under a fresh random 96-bit nonce. The persisted
//! pair is `iv = base64(nonce)` and `ciphertext = base64(ciphertext || tag)`.

use crate::encoding;
use crate::error::CryptoError;
use crate::memory::{SecretBuffer, SecretBytes};
use rand::rngs::OsRng;
use rand::RngCore;
use ring::{aead, digest};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// AES-256-GCM nonce length in bytes (96 bits).
pub const NONCE_LEN: usize = 12;

/// AES-256-GCM authentication tag length in bytes (128 bits).
pub const TAG_LEN: usize = 16;

/// AES-256-GCM key length in bytes (256 bits).
pub const KEY_LEN: usize = 32;

// ---------------------------------------------------------------------------
// Types
// ---------------------------------------------------------------------------

/// Persistable encrypted secret: base64 ciphertext and base64 IV.
///
/// Created by [`encrypt`], consumed by [`decrypt`]. Editing a secret means
/// encrypting again into a brand-new record; records are never patched.
#[must_use = "encrypted data must be stored"]
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EncryptedRecord {
    /// `base64(ciphertext || tag)`.
    pub ciphertext: String,
    /// `base64(nonce)`, 12 bytes before encoding.
    pub iv: String,
}

/// Decoded form of an [`EncryptedRecord`]: nonce, ciphertext and tag.
///
/// Any modification to the nonce, ciphertext, or tag causes [`open`] to fail.
#[must_use = "encrypted data must be stored"]
#[derive(Clone, Debug)]
pub struct SealedData {
    /// 96-bit random nonce, unique per encryption.
    pub nonce: [u8; NONCE_LEN],
    /// Encrypted data (same length as original plaintext).
    pub ciphertext: Vec<u8>,
    /// 128-bit authentication tag.
    pub tag: [u8; TAG_LEN],
}

impl SealedData {
    /// Encode as an [`EncryptedRecord`] (base64 `ciphertext || tag`, base64 nonce).
    pub fn to_record(&self) -> EncryptedRecord {
        let mut ct_tag = Vec::with_capacity(self.ciphertext.len().saturating_add(TAG_LEN));
        ct_tag.extend_from_slice(&self.ciphertext);
        ct_tag.extend_from_slice(&self.tag);
        EncryptedRecord {
            ciphertext: encoding::encode(&ct_tag),
            iv: encoding::encode(&self.nonce),
        }
    }

    /// Decode from the base64 pair stored for a record.
    ///
    /// # Errors
    ///
    /// Returns `CryptoError::Format` if either value is not valid base64,
    /// the IV is not 12 bytes, or the ciphertext is shorter than the tag.
    pub fn from_encoded(cipher_text_encoded: &str, iv_encoded: &str) -> Result<Self, CryptoError> {
        let nonce = encoding::decode_array::<NONCE_LEN>(iv_encoded, "iv")?;
        let ct_tag = encoding::decode(cipher_text_encoded)?;
        let (ciphertext, tag) = split_tag(&ct_tag)?;
        Ok(Self {
            nonce,
            ciphertext: ciphertext.to_vec(),
            tag,
        })
    }
}

/// Split `ciphertext || tag` into its two parts.
fn split_tag(ct_tag: &[u8]) -> Result<(&[u8], [u8; TAG_LEN]), CryptoError> {
    let ct_len = ct_tag.len().checked_sub(TAG_LEN).ok_or_else(|| {
        CryptoError::Format(format!(
            "ciphertext too short: {} bytes (minimum {TAG_LEN})",
            ct_tag.len()
        ))
    })?;
    let (ciphertext, tag_bytes) = ct_tag.split_at(ct_len);
    let mut tag = [0u8; TAG_LEN];
    tag.copy_from_slice(tag_bytes);
    Ok((ciphertext, tag))
}

// ---------------------------------------------------------------------------
// Key derivation
// ---------------------------------------------------------------------------

/// Derive the 256-bit record key from the master password.
///
/// SHA-256 over the UTF-8 bytes, fitted to exactly [`KEY_LEN`] bytes
/// (truncated if longer, zero-padded if shorter). Identical passwords always
/// yield identical keys; there is no salt and no randomness.
#[must_use]
pub fn derive_key(master_password: &str) -> SecretBytes<KEY_LEN> {
    let digest = digest::digest(&digest::SHA256, master_password.as_bytes());
    let mut key = [0u8; KEY_LEN];
    let n = core::cmp::min(KEY_LEN, digest.as_ref().len());
    key[..n].copy_from_slice(&digest.as_ref()[..n]);
    let result = SecretBytes::new(key);
    key.zeroize();
    result
}

// ---------------------------------------------------------------------------
// Record API
// ---------------------------------------------------------------------------

/// Encrypt a secret string under the master password.
///
/// Derives the key, draws a fresh nonce, seals the UTF-8 bytes and returns
/// the base64 pair. Nothing is persisted here.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` only if the cipher itself fails, which
/// does not happen for a correctly sized key.
pub fn encrypt(plain_text: &str, master_password: &str) -> Result<EncryptedRecord, CryptoError> {
    let key = derive_key(master_password);
    let sealed = seal(plain_text.as_bytes(), key.expose())?;
    Ok(sealed.to_record())
}

/// Decrypt a stored record under the master password.
///
/// # Errors
///
/// - `CryptoError::Format` if either value is malformed
/// - `CryptoError::Decryption` if authentication fails (wrong password or
///   corrupted data)
/// - `CryptoError::Encoding` if the plaintext is not valid UTF-8
pub fn decrypt(
    cipher_text_encoded: &str,
    iv_encoded: &str,
    master_password: &str,
) -> Result<SecretString, CryptoError> {
    let key = derive_key(master_password);
    let sealed = SealedData::from_encoded(cipher_text_encoded, iv_encoded)?;
    let plaintext = open(&sealed, key.expose())?;
    let text = std::str::from_utf8(plaintext.expose()).map_err(|_| CryptoError::Encoding)?;
    Ok(SecretString::from(text.to_owned()))
}

// ---------------------------------------------------------------------------
// AEAD primitives
// ---------------------------------------------------------------------------

fn aead_key(key: &[u8]) -> Result<aead::LessSafeKey, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::Encryption(format!(
            "invalid key length: {} bytes (expected {KEY_LEN})",
            key.len()
        )));
    }
    let unbound = aead::UnboundKey::new(&aead::AES_256_GCM, key)
        .map_err(|_| CryptoError::Encryption("failed to create AES-256-GCM key".into()))?;
    Ok(aead::LessSafeKey::new(unbound))
}

/// Encrypt bytes using AES-256-GCM with a random 96-bit nonce from `OsRng`.
///
/// `plaintext` may be empty; `key` must be exactly 32 bytes. No associated
/// data is bound.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not exactly 32 bytes or
/// sealing fails. Returns `CryptoError::SecureMemory` if the CSPRNG fails.
pub fn seal(plaintext: &[u8], key: &[u8]) -> Result<SealedData, CryptoError> {
    let less_safe_key = aead_key(key)?;

    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| CryptoError::SecureMemory(format!("CSPRNG fill failed: {e}")))?;
    let nonce = aead::Nonce::assume_unique_for_key(nonce_bytes);

    // Encrypt in place; the plaintext buffer becomes ciphertext.
    let mut in_out = plaintext.to_vec();
    let Ok(tag) =
        less_safe_key.seal_in_place_separate_tag(nonce, aead::Aad::empty(), &mut in_out)
    else {
        in_out.zeroize();
        return Err(CryptoError::Encryption(
            "AES-256-GCM encryption failed".into(),
        ));
    };

    let mut tag_bytes = [0u8; TAG_LEN];
    tag_bytes.copy_from_slice(tag.as_ref());

    Ok(SealedData {
        nonce: nonce_bytes,
        ciphertext: in_out,
        tag: tag_bytes,
    })
}

/// Decrypt and authenticate [`SealedData`].
///
/// Returns the plaintext as a [`SecretBuffer`]. The intermediate buffer is
/// zeroized on every path.
///
/// # Errors
///
/// Returns `CryptoError::Encryption` if the key is not exactly 32 bytes.
/// Returns `CryptoError::Decryption` if authentication fails (tampered data
/// or wrong key).
pub fn open(sealed: &SealedData, key: &[u8]) -> Result<SecretBuffer, CryptoError> {
    let less_safe_key = aead_key(key)?;
    let nonce = aead::Nonce::assume_unique_for_key(sealed.nonce);

    let mut ct_tag = Vec::with_capacity(sealed.ciphertext.len().saturating_add(TAG_LEN));
    ct_tag.extend_from_slice(&sealed.ciphertext);
    ct_tag.extend_from_slice(&sealed.tag);

    let result = less_safe_key
        .open_in_place(nonce, aead::Aad::empty(), &mut ct_tag)
        .map(|plaintext| SecretBuffer::new(plaintext))
        .map_err(|_| CryptoError::Decryption);
    ct_tag.zeroize();
    result
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
