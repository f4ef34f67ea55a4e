#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Security validation test suite for cofre-crypto-core.
//!
//! - CSPRNG output quality for IVs and salts
//! - Constant-time comparison via Welch's t-test

mod security;
