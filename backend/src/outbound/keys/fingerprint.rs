//! Public key fingerprinting for operational visibility.
//!
//! Operators can confirm which signing key is active from the start-up log
//! without the key material being printed.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// First 8 bytes of the SHA-256 of `public_pem`, as lowercase hex.
///
/// # Examples
///
/// ```rust
/// use food_api::outbound::keys::public_key_fingerprint;
///
/// let fp = public_key_fingerprint("-----BEGIN PUBLIC KEY-----\n...");
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn public_key_fingerprint(public_pem: &str) -> String {
    let digest = Sha256::digest(public_pem.as_bytes());
    hex::encode(&digest[..FINGERPRINT_BYTES])
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn fingerprint_is_deterministic() {
        assert_eq!(public_key_fingerprint("abc"), public_key_fingerprint("abc"));
    }

    #[rstest]
    fn fingerprint_is_truncated_sha256() {
        // sha256("abc") = ba7816bf8f01cfea...
        assert_eq!(public_key_fingerprint("abc"), "ba7816bf8f01cfea");
    }

    #[rstest]
    fn different_keys_produce_different_fingerprints() {
        assert_ne!(public_key_fingerprint("a"), public_key_fingerprint("b"));
    }
}
