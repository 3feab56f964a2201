//! Transparent encryption-at-rest for sensitive database column values,
//! with zero-downtime key rotation.
//!
//! New values are always written under the *primary* key; an optional
//! *secondary* key keeps values written before the most recent rotation
//! readable until a background re-encryption walk retires them. A decryptor
//! routes each stored value to the key that wrote it via a short fingerprint
//! tag on the ciphertext.
//!
//! # Ciphertext format
//!
//! ```text
//! <hash>:<base64( nonce[12] || AES-256-GCM ciphertext || tag[16] )>
//! ```
//!
//! where `<hash>` is the first 6 hex characters of SHA-256(key). A stored
//! string with no recognised `<hash>:` prefix is treated as legacy plaintext
//! and returned unchanged.
//!
//! # Entry points
//!
//! - [`Encryptor`] — construct one at the composition root and pass it to
//!   the components that need it.
//! - [`initialize`] and the package-level [`encrypt`]/[`decrypt`] calls —
//!   the process-wide default instance used by the storage adapters.
//! - [`EncryptedString`] / [`EncryptedJson`] — wrapper types the persistence
//!   layer binds and scans directly.

pub mod cipher;
pub mod codec;
pub mod default;
pub mod encryptor;
pub mod error;
pub mod keyhash;
pub mod keyset;
pub mod storage;

pub use cipher::{decrypt_with_key, encrypt_with_key, KEY_LEN, NONCE_LEN};
pub use default::{
    configured_to_encrypt, configured_to_rotate, decrypt, default_encryptor, encrypt, initialize,
    primary_key_hash, rotate_encryption, secondary_key_hash, set_default,
};
pub use encryptor::Encryptor;
pub use error::Error;
pub use keyset::{generate_key_material, Key};
pub use storage::{EncryptedJson, EncryptedString, StorageValue};
