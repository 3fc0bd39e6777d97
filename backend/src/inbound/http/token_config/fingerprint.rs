//! Token key fingerprinting for operational visibility.
//!
//! Provides a truncated SHA-256 fingerprint of the token signing key,
//! enabling operators to verify which key is active without exposing the key
//! material itself. Fingerprints are logged on startup and referenced in
//! rotation runbooks.

use sha2::{Digest, Sha256};

/// Length of the fingerprint in bytes before hex encoding.
const FINGERPRINT_BYTES: usize = 8;

/// Generate a truncated SHA-256 fingerprint of the signing key bytes.
///
/// Returns the first 8 bytes of the SHA-256 hash as a 16-character hex string.
/// This is sufficient for visual distinction in logs and runbooks without
/// being security-sensitive.
///
/// # Examples
///
/// ```rust
/// use backend::inbound::http::token_config::fingerprint::key_fingerprint;
///
/// let fp = key_fingerprint(b"super-secret-key");
///
/// assert_eq!(fp.len(), 16);
/// assert!(fp.chars().all(|c| c.is_ascii_hexdigit()));
/// ```
#[must_use]
pub fn key_fingerprint(key: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(key);
    let result = hasher.finalize();
    hex::encode(&result[..FINGERPRINT_BYTES])
}
