//! The process-wide default [`Encryptor`] and its package-level calls.
//!
//! The holder uses `arc-swap` so readers never block: every call takes a
//! consistent snapshot of the current instance. It starts as the no-op
//! variant and is written once during startup (or test setup), before any
//! concurrent reader touches the convenience functions. Reassigning it under
//! live traffic is unsupported; true hot rotation means either swapping in a
//! freshly constructed instance under a single-writer discipline, or
//! restarting the process.
//!
//! Components that can take an `&Encryptor` directly should; the default
//! instance exists for the storage-value adapters and other call sites the
//! persistence driver reaches without a handle to pass through.

use std::sync::{Arc, OnceLock};

use arc_swap::ArcSwap;
use tracing::{error, info};

use crate::encryptor::Encryptor;
use crate::error::Error;

static DEFAULT: OnceLock<ArcSwap<Encryptor>> = OnceLock::new();

fn holder() -> &'static ArcSwap<Encryptor> {
    DEFAULT.get_or_init(|| ArcSwap::from_pointee(Encryptor::noop()))
}

/// Install `encryptor` as the process-wide default instance.
///
/// Single-writer discipline: call once at startup, before concurrent readers.
pub fn set_default(encryptor: Encryptor) {
    holder().store(Arc::new(encryptor));
}

/// Take a snapshot of the current default instance.
pub fn default_encryptor() -> Arc<Encryptor> {
    holder().load_full()
}

/// Bootstrap the default instance from optional key material.
///
/// This is the composition-root path that deliberately trades
/// confidentiality for availability: malformed material does not abort the
/// process, it installs the no-op passthrough variant — and logs the failure
/// loudly, because from here on sensitive values are stored as plaintext.
/// The returned error mirrors what was logged so callers can surface it in
/// their own health reporting.
pub fn initialize(material: Option<&str>) -> Result<(), Error> {
    match material {
        None => {
            info!("no encryption key material configured; storing values as plaintext");
            set_default(Encryptor::noop());
            Ok(())
        }
        Some(material) => match Encryptor::from_key_material(material) {
            Ok(enc) => {
                info!(
                    primary_key = enc.primary_key_hash(),
                    rotation_ready = enc.configured_to_rotate(),
                    "column encryption enabled"
                );
                set_default(enc);
                Ok(())
            }
            Err(e) => {
                error!(
                    error = %e,
                    "invalid encryption key material; falling back to plaintext passthrough"
                );
                set_default(Encryptor::noop());
                Err(e)
            }
        },
    }
}

/// Encrypt with the default instance. See [`Encryptor::encrypt`].
pub fn encrypt(plaintext: &str) -> Result<String, Error> {
    holder().load().encrypt(plaintext)
}

/// Decrypt with the default instance. See [`Encryptor::decrypt`].
pub fn decrypt(value: &str) -> Result<String, Error> {
    holder().load().decrypt(value)
}

/// Rotate one raw payload with the default instance.
/// See [`Encryptor::rotate_encryption`].
pub fn rotate_encryption(payload: &[u8]) -> Result<Vec<u8>, Error> {
    holder().load().rotate_encryption(payload)
}

/// Whether the default instance holds a primary key.
pub fn configured_to_encrypt() -> bool {
    holder().load().configured_to_encrypt()
}

/// Whether the default instance holds both keys.
pub fn configured_to_rotate() -> bool {
    holder().load().configured_to_rotate()
}

/// Fingerprint of the default instance's primary key; `""` when unconfigured.
pub fn primary_key_hash() -> String {
    holder().load().primary_key_hash().to_owned()
}

/// Fingerprint of the default instance's secondary key; `""` when absent.
pub fn secondary_key_hash() -> String {
    holder().load().secondary_key_hash().to_owned()
}
