//! Register, log in, and use the master password to protect a secret.

use cofre_crypto_core::{decrypt, encrypt, Argon2idParams, CredentialVerifier, CryptoError};
use secrecy::ExposeSecret;

const FAST_VERIFIER: CredentialVerifier = CredentialVerifier::with_params(Argon2idParams {
    m_cost: 64,
    t_cost: 1,
    p_cost: 1,
});

#[test]
fn register_verify_encrypt_decrypt() {
    let stored = FAST_VERIFIER
        .register("correct-horse-1")
        .expect("registration should succeed");

    assert!(FAST_VERIFIER.verify("correct-horse-1", &stored));
    assert!(!FAST_VERIFIER.verify("wrong-password", &stored));

    let record = encrypt("mySecretPw!", "correct-horse-1").expect("encrypt should succeed");
    let plain = decrypt(&record.ciphertext, &record.iv, "correct-horse-1")
        .expect("decrypt should succeed");
    assert_eq!(plain.expose_secret(), "mySecretPw!");

    let err = decrypt(&record.ciphertext, &record.iv, "wrong-password")
        .expect_err("wrong password must not decrypt");
    assert!(matches!(err, CryptoError::Decryption));
    assert!(err.is_authentication_failure());
}

#[test]
fn credential_record_is_independent_of_record_key() {
    let stored = FAST_VERIFIER.register("correct-horse-1").expect("register");
    let record = encrypt("mySecretPw!", "correct-horse-1").expect("encrypt");

    // Neither persisted value may equal any part of the other.
    assert_ne!(stored.hash, record.ciphertext);
    assert_ne!(stored.salt, record.iv);
}

#[test]
fn default_verifier_end_to_end() {
    let verifier = CredentialVerifier::default();
    let stored = verifier.register("correct-horse-1").expect("register");
    assert!(verifier.verify("correct-horse-1", &stored));
    assert!(!verifier.verify("correct-horse-1 ", &stored));
}
