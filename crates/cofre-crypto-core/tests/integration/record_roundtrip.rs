//! Record encryption through the persisted (JSON / base64) representation.

use cofre_crypto_core::symmetric::{decrypt, encrypt, EncryptedRecord, SealedData, NONCE_LEN};
use secrecy::ExposeSecret;

#[test]
fn roundtrip_through_json() {
    let secret = "p@ssw0rd with ünïcödé ✓";
    let record = encrypt(secret, "master").expect("encrypt should succeed");
    let json = serde_json::to_string(&record).expect("serialize should succeed");
    let restored: EncryptedRecord = serde_json::from_str(&json).expect("deserialize");
    let plain = decrypt(&restored.ciphertext, &restored.iv, "master").expect("decrypt");
    assert_eq!(plain.expose_secret(), secret);
}

#[test]
fn roundtrip_64kb_secret() {
    let secret = "x".repeat(65_536);
    let record = encrypt(&secret, "master").expect("encrypt 64KB should succeed");
    let plain = decrypt(&record.ciphertext, &record.iv, "master").expect("decrypt");
    assert_eq!(plain.expose_secret().len(), 65_536);
}

#[test]
fn line_wrapped_storage_still_decrypts() {
    let record = encrypt("wrapped", "master").expect("encrypt should succeed");
    let wrapped: String = record
        .ciphertext
        .chars()
        .enumerate()
        .flat_map(|(i, c)| {
            if i > 0 && i % 8 == 0 {
                vec!['\n', c]
            } else {
                vec![c]
            }
        })
        .collect();
    let plain = decrypt(&wrapped, &format!("{}\n", record.iv), "master").expect("decrypt");
    assert_eq!(plain.expose_secret(), "wrapped");
}

#[test]
fn decoded_record_reencodes_identically() {
    let record = encrypt("layout", "master").expect("encrypt should succeed");
    let sealed = SealedData::from_encoded(&record.ciphertext, &record.iv).expect("decode");
    assert_eq!(sealed.nonce.len(), NONCE_LEN);
    assert_eq!(sealed.ciphertext.len(), "layout".len());
    assert_eq!(sealed.to_record(), record);
}
