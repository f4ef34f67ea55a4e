#![allow(clippy::unwrap_used, clippy::arithmetic_side_effects)]

//! Shared use of the core from several threads at once.

use std::thread;

use cofre_crypto_core::symmetric::{decrypt, encrypt, EncryptedRecord, SealedData};
use cofre_crypto_core::{
    Argon2idParams, CredentialRecord, CredentialVerifier, CryptoError, SecretBuffer, SecretBytes,
};
use secrecy::ExposeSecret;

const TEST_VERIFIER: CredentialVerifier = CredentialVerifier::with_params(Argon2idParams {
    m_cost: 32,
    t_cost: 1,
    p_cost: 1,
});

const THREADS: usize = 8;
const ROUNDS: usize = 16;

#[allow(dead_code)]
const fn assert_send_sync<T: Send + Sync>() {}

#[allow(dead_code)]
const _: () = {
    assert_send_sync::<CredentialVerifier>();
    assert_send_sync::<CredentialRecord>();
    assert_send_sync::<EncryptedRecord>();
    assert_send_sync::<SealedData>();
    assert_send_sync::<CryptoError>();
    assert_send_sync::<SecretBuffer>();
    assert_send_sync::<SecretBytes<32>>();
};

#[test]
fn parallel_record_roundtrips() {
    let records: Vec<Vec<(String, EncryptedRecord)>> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|t| {
                s.spawn(move || {
                    (0..ROUNDS)
                        .map(|r| {
                            let secret = format!("secret-{t}-{r}");
                            let record = encrypt(&secret, "correct-horse-1").unwrap();
                            let plain =
                                decrypt(&record.ciphertext, &record.iv, "correct-horse-1").unwrap();
                            assert_eq!(plain.expose_secret(), secret);
                            (secret, record)
                        })
                        .collect::<Vec<_>>()
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    // Records produced on other threads open here too, and no IV repeats.
    let mut ivs = std::collections::HashSet::new();
    for (secret, record) in records.iter().flatten() {
        let plain = decrypt(&record.ciphertext, &record.iv, "correct-horse-1").unwrap();
        assert_eq!(plain.expose_secret(), secret.as_str());
        assert!(ivs.insert(record.iv.clone()));
    }
    assert_eq!(ivs.len(), THREADS * ROUNDS);
}

#[test]
fn parallel_verification_against_one_record() {
    let record = TEST_VERIFIER.register("correct-horse-1").unwrap();
    let verifier = TEST_VERIFIER;

    let outcomes: Vec<(bool, bool)> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let record = &record;
                s.spawn(move || {
                    (
                        verifier.verify("correct-horse-1", record),
                        verifier.verify("wrong-password", record),
                    )
                })
            })
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    assert_eq!(outcomes.len(), THREADS);
    assert!(outcomes.iter().all(|&(right, wrong)| right && !wrong));
}

#[test]
fn parallel_registrations_get_distinct_salts() {
    let records: Vec<CredentialRecord> = thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| s.spawn(|| TEST_VERIFIER.register("same-password").unwrap()))
            .collect();
        handles.into_iter().map(|h| h.join().unwrap()).collect()
    });

    for (i, a) in records.iter().enumerate() {
        assert!(TEST_VERIFIER.verify("same-password", a));
        for b in &records[i + 1..] {
            assert_ne!(a.salt, b.salt);
            assert_ne!(a.hash, b.hash);
        }
    }
}
