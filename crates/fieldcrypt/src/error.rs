//! The closed error taxonomy for the encryption layer.

use thiserror::Error;

/// Top-level encryption error type.
///
/// Every failure in this crate is one of four kinds, so callers branch on the
/// variant rather than matching message strings:
/// - [`Error::Configuration`] → bad key material, surfaced at construction time
/// - [`Error::Encrypt`] → structural failure on the encrypt path, never transient
/// - [`Error::Decrypt`] → corrupted, truncated, or tampered ciphertext
/// - [`Error::Rotation`] → a re-encryption pass that cannot make progress
#[derive(Debug, Error)]
pub enum Error {
    /// The key material string is malformed or a key has the wrong length.
    #[error("encryption configuration error: {0}")]
    Configuration(String),

    /// CSPRNG or cipher-construction failure on the encrypt path.
    #[error("encrypt failed: {0}")]
    Encrypt(String),

    /// Malformed base64, truncated payload, or GCM authentication failure.
    ///
    /// Authentication failure covers both tampering and a wrong key; the two
    /// are deliberately indistinguishable to the caller.
    #[error("decrypt failed: {0}")]
    Decrypt(String),

    /// Rotation invoked without both keys, or the value decrypts under
    /// neither configured key.
    #[error("rotation failed: {0}")]
    Rotation(String),
}
