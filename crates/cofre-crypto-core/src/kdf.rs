//! Argon2id password hashing primitive.
//!
//! This module provides:
//! - [`derive`]: derive a 256-bit value from a password + salt using Argon2id
//! - [`Argon2idParams`]: serializable work-factor parameter set
//!
//! It is the slow, salted half of the crate. The fast, unsalted key
//! derivation used for record encryption lives in [`crate::symmetric`].

use crate::error::CryptoError;
use crate::memory::SecretBytes;
use serde::{Deserialize, Serialize};
use zeroize::Zeroize;

/// Output length of the KDF in bytes (256 bits).
pub const OUTPUT_LEN: usize = 32;

/// Minimum salt length in bytes. We enforce 16 (stricter than argon2's 8).
pub const MIN_SALT_LEN: usize = 16;

/// Argon2id parameter set.
///
/// Fields use the `argon2` crate convention:
/// - `m_cost`: memory in KiB (NOT bytes, NOT MB)
/// - `t_cost`: number of iterations
/// - `p_cost`: degree of parallelism
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Argon2idParams {
    /// Memory cost in kibibytes (1 KiB = 1024 bytes).
    pub m_cost: u32,
    /// Number of iterations (time cost).
    pub t_cost: u32,
    /// Degree of parallelism (number of lanes).
    pub p_cost: u32,
}

/// Derive a 256-bit value from a password and salt using Argon2id (v1.3).
///
/// Deterministic for identical `(password, salt, params)`. The intermediate
/// output buffer is zeroized after it is moved into the returned value.
///
/// This function accepts any password length, including empty. Password
/// policy (minimum length) is enforced by the vault layer.
///
/// # Errors
///
/// Returns `CryptoError::KeyDerivation` if:
/// - The salt is shorter than 16 bytes
/// - The argon2 parameters are invalid
/// - The derivation itself fails (e.g., memory allocation)
pub fn derive(
    password: &[u8],
    salt: &[u8],
    params: &Argon2idParams,
) -> Result<SecretBytes<OUTPUT_LEN>, CryptoError> {
    if salt.len() < MIN_SALT_LEN {
        return Err(CryptoError::KeyDerivation(format!(
            "salt too short: {} bytes (minimum {MIN_SALT_LEN})",
            salt.len()
        )));
    }

    let argon2_params = argon2::Params::new(
        params.m_cost,
        params.t_cost,
        params.p_cost,
        Some(OUTPUT_LEN),
    )
    .map_err(|e| CryptoError::KeyDerivation(format!("invalid argon2 params: {e}")))?;

    let argon2 = argon2::Argon2::new(
        argon2::Algorithm::Argon2id,
        argon2::Version::V0x13,
        argon2_params,
    );

    let mut output = [0u8; OUTPUT_LEN];
    if let Err(e) = argon2.hash_password_into(password, salt, &mut output) {
        output.zeroize();
        return Err(CryptoError::KeyDerivation(format!(
            "argon2id derivation failed: {e}"
        )));
    }

    let result = SecretBytes::new(output);
    output.zeroize();
    Ok(result)
}
