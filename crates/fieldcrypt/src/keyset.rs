//! Key material: the [`Key`] type and the delimited-string loader.
//!
//! Key material reaches the process as a single string, either
//! `"<primary>"` or `"<primary>,<secondary>"`, where each token is exactly
//! [`KEY_LEN`] raw bytes. How that string is encoded on disk or in the
//! environment is a deployment concern outside this crate's contract.

use crate::cipher::KEY_LEN;
use crate::error::Error;

/// An AES-256 key: exactly [`KEY_LEN`] bytes, immutable once constructed.
///
/// The backing memory is overwritten with zeroes on drop to minimise the
/// window during which key material lives in RAM.
#[derive(Clone)]
pub struct Key(Box<[u8; KEY_LEN]>);

impl Key {
    /// Construct a [`Key`] from raw bytes.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] if `bytes` is not exactly
    /// [`KEY_LEN`] bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, Error> {
        if bytes.len() != KEY_LEN {
            return Err(Error::Configuration(format!(
                "invalid key length: expected {KEY_LEN} bytes, got {}",
                bytes.len()
            )));
        }
        let mut buf = Box::new([0u8; KEY_LEN]);
        buf.copy_from_slice(bytes);
        Ok(Self(buf))
    }

    pub(crate) fn as_bytes(&self) -> &[u8] {
        &self.0[..]
    }
}

impl Drop for Key {
    fn drop(&mut self) {
        // Zero the key material on drop.
        self.0.iter_mut().for_each(|b| *b = 0);
    }
}

impl std::fmt::Debug for Key {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Never print key material — not even in debug builds.
        f.write_str("Key([REDACTED])")
    }
}

/// Split a key-material string into its primary and optional secondary token.
///
/// Token byte-length is not validated here; that check belongs to
/// [`Key::from_bytes`].
///
/// # Errors
///
/// Returns [`Error::Configuration`] if the string holds anything other than
/// one or two comma-separated tokens.
pub fn split_key_material(material: &str) -> Result<(&str, Option<&str>), Error> {
    let tokens: Vec<&str> = material.split(',').collect();
    match tokens[..] {
        [primary] => Ok((primary, None)),
        [primary, secondary] => Ok((primary, Some(secondary))),
        _ => Err(Error::Configuration(format!(
            "key material must hold one or two comma-separated keys, got {} tokens",
            tokens.len()
        ))),
    }
}

const KEY_MATERIAL_CHARSET: &[u8] =
    b"ABCDEFGHIJKLMNOPQRSTUVWXYZabcdefghijklmnopqrstuvwxyz0123456789";

/// Generate fresh key material: [`KEY_LEN`] random alphanumeric characters,
/// one key byte each, safe to place in an environment variable and free of
/// the `,` delimiter.
pub fn generate_key_material() -> String {
    use aes_gcm::aead::{rand_core::RngCore, OsRng};
    let mut bytes = [0u8; KEY_LEN];
    OsRng.fill_bytes(&mut bytes);
    bytes
        .iter()
        .map(|b| KEY_MATERIAL_CHARSET[*b as usize % KEY_MATERIAL_CHARSET.len()] as char)
        .collect()
}
