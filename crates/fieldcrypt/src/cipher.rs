//! Raw AES-256-GCM encrypt/decrypt over arbitrary byte payloads.
//!
//! This module is intentionally free of wire-format and key-management
//! concerns. It produces and consumes the payload layout
//!
//! ```text
//! nonce[12] || ciphertext || tag[16]
//! ```
//!
//! A fresh random nonce is drawn from the OS CSPRNG on every call, so equal
//! plaintexts under the same key yield distinct outputs. A random-source
//! failure is surfaced as an error; a nonce is never reused.

use aes_gcm::{
    aead::{Aead, KeyInit, OsRng},
    Aes256Gcm, Nonce,
};

use crate::error::Error;

/// Byte length of an AES-256 key (32 bytes = 256 bits).
pub const KEY_LEN: usize = 32;

/// Byte length of an AES-GCM nonce (12 bytes = 96 bits).
pub const NONCE_LEN: usize = 12;

/// Byte length of the GCM authentication tag (16 bytes = 128 bits).
pub const TAG_LEN: usize = 16;

/// Encrypt `plaintext` under `key`, returning `nonce || ciphertext || tag`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`Error::Encrypt`] if the CSPRNG fails or the AEAD rejects the
/// operation — both are structural, not transient, and must not be retried.
pub fn encrypt_with_key(plaintext: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = build_cipher(key)?;

    use aes_gcm::aead::rand_core::RngCore;
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng
        .try_fill_bytes(&mut nonce_bytes)
        .map_err(|e| Error::Encrypt(format!("failed to source random nonce: {e}")))?;
    let nonce = Nonce::from_slice(&nonce_bytes);

    let ciphertext = cipher
        .encrypt(nonce, plaintext)
        .map_err(|_| Error::Encrypt("aead encryption failed".into()))?;

    let mut out = Vec::with_capacity(NONCE_LEN + ciphertext.len());
    out.extend_from_slice(&nonce_bytes);
    out.extend_from_slice(&ciphertext);
    Ok(out)
}

/// Decrypt a `nonce || ciphertext || tag` payload under `key`.
///
/// # Errors
///
/// Returns [`Error::Configuration`] if `key` is not [`KEY_LEN`] bytes.
/// Returns [`Error::Decrypt`] if the payload is shorter than a nonce plus a
/// tag, or if authentication fails. Tampered data and a wrong key produce the
/// same error.
pub fn decrypt_with_key(payload: &[u8], key: &[u8]) -> Result<Vec<u8>, Error> {
    let cipher = build_cipher(key)?;

    if payload.len() < NONCE_LEN + TAG_LEN {
        return Err(Error::Decrypt(
            "payload shorter than nonce and authentication tag".into(),
        ));
    }

    let (nonce_bytes, ciphertext) = payload.split_at(NONCE_LEN);
    let nonce = Nonce::from_slice(nonce_bytes);

    cipher
        .decrypt(nonce, ciphertext)
        .map_err(|_| Error::Decrypt("aead authentication failed".into()))
}

fn build_cipher(key: &[u8]) -> Result<Aes256Gcm, Error> {
    if key.len() != KEY_LEN {
        return Err(Error::Configuration(format!(
            "invalid key length: expected {KEY_LEN} bytes, got {}",
            key.len()
        )));
    }
    Aes256Gcm::new_from_slice(key)
        .map_err(|_| Error::Configuration(format!("invalid key length: expected {KEY_LEN} bytes")))
}
