//! The [`Encryptor`]: up to two keys, their cached fingerprints, and the
//! encrypt/decrypt/rotate operations over tagged ciphertext.
//!
//! # Lifecycle
//!
//! 1. At startup the key material string is parsed into a primary key and an
//!    optional secondary key; their fingerprints are computed once and cached
//!    for the instance's lifetime.
//! 2. The instance is immutable from then on and safe to share across
//!    unbounded concurrent callers without locking. Rotation is expressed by
//!    constructing a *new* instance with the keys swapped, never by mutating
//!    an existing one.
//! 3. When key material is absent or invalid, the composition root installs
//!    the no-op variant instead: encrypt and decrypt become the identity and
//!    never error, trading confidentiality for availability.
//!
//! # Rotation
//!
//! To replace key `k1` with `k2` without downtime, deploy
//! `Encryptor::aes(k2, Some(k1))`: new writes go out under `k2` while rows
//! still tagged with `k1`'s fingerprint remain readable. A background job
//! then walks stored rows through [`Encryptor::rotate_encryption`] until no
//! `k1`-tagged value remains, after which `k1` can be dropped from the
//! material.

use crate::cipher;
use crate::codec;
use crate::error::Error;
use crate::keyhash;
use crate::keyset::{split_key_material, Key};

/// Column-value encryptor holding up to two keys.
///
/// Construct with [`Encryptor::aes`], [`Encryptor::from_key_material`], or
/// [`Encryptor::noop`].
#[derive(Debug)]
pub struct Encryptor {
    // `None` is the no-op passthrough variant.
    keys: Option<Keys>,
}

#[derive(Debug)]
struct Keys {
    primary: Key,
    primary_hash: String,
    secondary: Option<Key>,
    // Empty when `secondary` is absent, mirroring the accessor contract.
    secondary_hash: String,
}

impl Encryptor {
    /// The no-op passthrough variant: encrypt and decrypt are the identity,
    /// both `configured_to_*` queries report false, and no call ever errors.
    pub fn noop() -> Self {
        Self { keys: None }
    }

    /// An AES-256-GCM encryptor writing under `primary` and, when present,
    /// still able to read values written under `secondary`.
    pub fn aes(primary: Key, secondary: Option<Key>) -> Self {
        let primary_hash = keyhash::fingerprint(primary.as_bytes());
        let secondary_hash = secondary
            .as_ref()
            .map(|k| keyhash::fingerprint(k.as_bytes()))
            .unwrap_or_default();
        Self {
            keys: Some(Keys {
                primary,
                primary_hash,
                secondary,
                secondary_hash,
            }),
        }
    }

    /// Build an encryptor from a delimited key-material string:
    /// `"<primary>"` or `"<primary>,<secondary>"`, each exactly 32 bytes.
    ///
    /// This constructor is strict. The sanctioned degrade-to-no-op on bad
    /// material happens at the composition root (see
    /// [`crate::default::initialize`]), which is also where the failure gets
    /// logged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Configuration`] on a malformed token count or a key
    /// of the wrong length.
    pub fn from_key_material(material: &str) -> Result<Self, Error> {
        let (primary, secondary) = split_key_material(material)?;
        let primary = Key::from_bytes(primary.as_bytes())?;
        let secondary = secondary
            .map(|s| Key::from_bytes(s.as_bytes()))
            .transpose()?;
        Ok(Self::aes(primary, secondary))
    }

    /// True iff a valid primary key is loaded.
    pub fn configured_to_encrypt(&self) -> bool {
        self.keys.is_some()
    }

    /// True iff both a primary and a secondary key are loaded.
    pub fn configured_to_rotate(&self) -> bool {
        self.keys
            .as_ref()
            .is_some_and(|keys| keys.secondary.is_some())
    }

    /// Fingerprint of the primary key; `""` for the no-op variant.
    pub fn primary_key_hash(&self) -> &str {
        self.keys
            .as_ref()
            .map(|keys| keys.primary_hash.as_str())
            .unwrap_or("")
    }

    /// Fingerprint of the secondary key; `""` when no secondary is loaded.
    pub fn secondary_key_hash(&self) -> &str {
        self.keys
            .as_ref()
            .map(|keys| keys.secondary_hash.as_str())
            .unwrap_or("")
    }

    /// Encrypt `plaintext` under the primary key and tag it with the
    /// primary fingerprint. The no-op variant returns the input unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Encrypt`] on CSPRNG or cipher failure.
    pub fn encrypt(&self, plaintext: &str) -> Result<String, Error> {
        let Some(keys) = &self.keys else {
            return Ok(plaintext.to_owned());
        };
        let payload = cipher::encrypt_with_key(plaintext.as_bytes(), keys.primary.as_bytes())?;
        Ok(codec::tag(&keys.primary_hash, &payload))
    }

    /// Decrypt a stored value.
    ///
    /// The fingerprint prefix routes the value to the key that wrote it:
    /// primary first, then secondary. A value carrying neither fingerprint is
    /// returned unchanged — it is legacy plaintext written before encryption
    /// was enabled. That also means ciphertext under a key that has since
    /// been discarded without a completed rotation pass will pass through
    /// silently; operators must finish the rotation walk before dropping a
    /// key.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decrypt`] if a recognised prefix carries malformed
    /// base64, fails GCM authentication, or decrypts to non-UTF-8 bytes.
    pub fn decrypt(&self, value: &str) -> Result<String, Error> {
        let Some(keys) = &self.keys else {
            return Ok(value.to_owned());
        };

        if let Some(payload) = codec::strip_tag(value, &keys.primary_hash) {
            let raw = codec::decode_payload(payload)?;
            let plaintext = cipher::decrypt_with_key(&raw, keys.primary.as_bytes())?;
            return into_utf8(plaintext);
        }

        if let Some(secondary) = &keys.secondary {
            if let Some(payload) = codec::strip_tag(value, &keys.secondary_hash) {
                let raw = codec::decode_payload(payload)?;
                let plaintext = cipher::decrypt_with_key(&raw, secondary.as_bytes())?;
                return into_utf8(plaintext);
            }
        }

        Ok(value.to_owned())
    }

    /// Re-encrypt one raw payload (`nonce || ciphertext || tag`, no
    /// fingerprint tag, no base64) from the secondary key to the primary.
    ///
    /// Used by the background job walking stored rows after a key change.
    /// A payload that already decrypts under the primary key is returned
    /// unchanged, so re-running the walk over migrated rows is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Rotation`] if no secondary key is loaded or the
    /// payload decrypts under neither key. Rotation is all-or-nothing per
    /// value; callers retry whole rows, never partial ciphertext.
    pub fn rotate_encryption(&self, payload: &[u8]) -> Result<Vec<u8>, Error> {
        let Some(keys) = &self.keys else {
            return Err(Error::Rotation("no keys loaded".into()));
        };
        let Some(secondary) = &keys.secondary else {
            return Err(Error::Rotation("no secondary key loaded".into()));
        };

        if let Ok(plaintext) = cipher::decrypt_with_key(payload, secondary.as_bytes()) {
            return cipher::encrypt_with_key(&plaintext, keys.primary.as_bytes());
        }

        // Already migrated: the value decrypts under the primary key.
        if cipher::decrypt_with_key(payload, keys.primary.as_bytes()).is_ok() {
            return Ok(payload.to_vec());
        }

        Err(Error::Rotation(
            "value does not decrypt under either configured key".into(),
        ))
    }
}

fn into_utf8(bytes: Vec<u8>) -> Result<String, Error> {
    String::from_utf8(bytes)
        .map_err(|_| Error::Decrypt("recovered plaintext is not valid UTF-8".into()))
}
