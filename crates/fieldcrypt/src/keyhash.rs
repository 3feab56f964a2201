//! Short key fingerprints used to route ciphertext to the key that wrote it.
//!
//! The fingerprint is the first [`KEY_HASH_LEN`] hex characters of
//! SHA-256(key). Collisions are an accepted tradeoff: the hash is a routing
//! tag on the ciphertext prefix, not an authentication mechanism — GCM's tag
//! is what authenticates the payload.

use sha2::{Digest, Sha256};

/// Number of lowercase hex characters in a key fingerprint.
pub const KEY_HASH_LEN: usize = 6;

/// Compute the fingerprint of `key`.
pub fn fingerprint(key: &[u8]) -> String {
    let digest = format!("{:x}", Sha256::digest(key));
    digest[..KEY_HASH_LEN].to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fingerprint_is_six_lowercase_hex_chars() {
        let fp = fingerprint(&[0x01u8; 32]);
        assert_eq!(fp.len(), KEY_HASH_LEN);
        assert!(fp.chars().all(|c| c.is_ascii_hexdigit() && !c.is_ascii_uppercase()));
    }

    #[test]
    fn fingerprint_is_deterministic() {
        assert_eq!(fingerprint(b"some key"), fingerprint(b"some key"));
    }

    #[test]
    fn distinct_keys_have_distinct_fingerprints() {
        // Not guaranteed for arbitrary keys, but these two well-known test
        // keys must differ for prefix routing to be testable at all.
        assert_ne!(fingerprint(&[0x01u8; 32]), fingerprint(&[0x02u8; 32]));
    }
}
