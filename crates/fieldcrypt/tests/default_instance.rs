//! Lifecycle of the process-wide default instance.
//!
//! The holder is written once at startup and read concurrently thereafter;
//! re-initialisation mid-test is the sanctioned test-setup use. The phases
//! below run inside a single test function because they share that one
//! per-process holder.

use fieldcrypt::{codec, Error};

#[test]
fn default_instance_lifecycle() {
    // Unconfigured: both calls are the identity and nothing is reported as
    // configured.
    assert!(!fieldcrypt::configured_to_encrypt());
    assert!(!fieldcrypt::configured_to_rotate());
    assert_eq!(fieldcrypt::primary_key_hash(), "");
    assert_eq!(fieldcrypt::secondary_key_hash(), "");
    assert_eq!(fieldcrypt::encrypt("token").unwrap(), "token");
    assert_eq!(fieldcrypt::decrypt("token").unwrap(), "token");

    // Single key configured.
    let k1 = "a".repeat(32);
    fieldcrypt::initialize(Some(&k1)).unwrap();
    assert!(fieldcrypt::configured_to_encrypt());
    assert!(!fieldcrypt::configured_to_rotate());
    let c1 = fieldcrypt::encrypt("hello").unwrap();
    let h1 = fieldcrypt::primary_key_hash();
    assert!(c1.starts_with(&format!("{h1}:")));
    assert_eq!(fieldcrypt::decrypt(&c1).unwrap(), "hello");

    // Rotation deployed: new primary, old key demoted to secondary.
    let material = format!("{},{}", "b".repeat(32), k1);
    fieldcrypt::initialize(Some(&material)).unwrap();
    assert!(fieldcrypt::configured_to_rotate());
    assert_eq!(fieldcrypt::secondary_key_hash(), h1);
    assert_ne!(fieldcrypt::primary_key_hash(), h1);
    assert_eq!(fieldcrypt::decrypt(&c1).unwrap(), "hello");

    // The raw-payload rotation path works through the default instance too.
    let payload = codec::decode_payload(codec::strip_tag(&c1, &h1).unwrap()).unwrap();
    let migrated = fieldcrypt::rotate_encryption(&payload).unwrap();
    let c2 = codec::tag(&fieldcrypt::primary_key_hash(), &migrated);
    assert_eq!(fieldcrypt::decrypt(&c2).unwrap(), "hello");

    // Invalid material: the error surfaces, and the process degrades to
    // passthrough instead of crashing.
    let err = fieldcrypt::initialize(Some("not-32-bytes")).unwrap_err();
    assert!(matches!(err, Error::Configuration(_)));
    assert!(!fieldcrypt::configured_to_encrypt());
    assert_eq!(fieldcrypt::encrypt("value").unwrap(), "value");

    // Explicitly unconfigured: same passthrough.
    fieldcrypt::initialize(None).unwrap();
    assert!(!fieldcrypt::configured_to_encrypt());
    assert_eq!(fieldcrypt::decrypt("value").unwrap(), "value");
}
