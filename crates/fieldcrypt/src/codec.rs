//! The ciphertext wire format.
//!
//! ```text
//! <hash>       := 6 lowercase hex chars, first 6 hex chars of SHA-256(key)
//! <payload>    := base64( nonce[12] || AES-256-GCM ciphertext || tag[16] )
//! <ciphertext> := <hash> ":" <payload>
//! ```
//!
//! A string with no recognised `<hash>:` prefix is, by contract, the
//! plaintext itself — that is the backward-compatibility path for rows
//! written before encryption was enabled.

use base64::{engine::general_purpose::STANDARD, Engine as _};

use crate::error::Error;

/// Separator between the key hash and the base64 payload.
pub const SEPARATOR: char = ':';

/// Render a tagged ciphertext string from a key hash and a raw payload.
pub fn tag(key_hash: &str, payload: &[u8]) -> String {
    format!("{key_hash}{SEPARATOR}{}", STANDARD.encode(payload))
}

/// If `value` carries the `<key_hash>:` prefix, return the payload portion.
///
/// An empty key hash never matches: the no-op encryptor has no fingerprint,
/// and a bare leading `:` must not be mistaken for a tag.
pub fn strip_tag<'a>(value: &'a str, key_hash: &str) -> Option<&'a str> {
    if key_hash.is_empty() {
        return None;
    }
    value.strip_prefix(key_hash)?.strip_prefix(SEPARATOR)
}

/// Decode a base64 payload into raw bytes.
///
/// # Errors
///
/// Returns [`Error::Decrypt`] if the payload is not valid base64.
pub fn decode_payload(payload: &str) -> Result<Vec<u8>, Error> {
    STANDARD
        .decode(payload)
        .map_err(|e| Error::Decrypt(format!("malformed base64 payload: {e}")))
}
