//! Bearer token issuing and verification.
//!
//! Tokens are opaque to clients but cheap for the server to verify without a
//! store lookup: `{handle}.{expiry_unix}.{signature}` where the signature is
//! the hex HMAC-SHA256 of `{handle}.{expiry_unix}` under a server-side key.
//! Handles cannot contain `.`, so the three-way split is unambiguous.

use chrono::{DateTime, Duration, Utc};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use zeroize::Zeroizing;

use super::error::Error;
use super::handle::Handle;

type HmacSha256 = Hmac<Sha256>;

/// Default bearer token lifetime: seven days.
pub const DEFAULT_TOKEN_TTL_SECONDS: i64 = 604_800;

/// Issues and verifies signed bearer tokens.
///
/// # Examples
/// ```
/// use backend::domain::{Handle, TokenSigner};
/// use chrono::{Duration, TimeZone, Utc};
///
/// let signer = TokenSigner::new(b"super-secret-key".to_vec(), Duration::days(7));
/// let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).single().expect("valid instant");
/// let handle = Handle::new("alice").unwrap();
/// let token = signer.issue(&handle, now).unwrap();
/// assert_eq!(signer.verify(&token, now), Some(handle));
/// ```
pub struct TokenSigner {
    key: Zeroizing<Vec<u8>>,
    ttl: Duration,
}

impl TokenSigner {
    /// Build a signer over the given key material and token lifetime.
    pub fn new(key: Vec<u8>, ttl: Duration) -> Self {
        Self {
            key: Zeroizing::new(key),
            ttl,
        }
    }

    fn mac_for(&self, payload: &str) -> Result<HmacSha256, Error> {
        let mut mac = HmacSha256::new_from_slice(&self.key)
            .map_err(|_| Error::internal("token key rejected by HMAC"))?;
        mac.update(payload.as_bytes());
        Ok(mac)
    }

    /// Issue a token for `handle` expiring `ttl` after `now`.
    pub fn issue(&self, handle: &Handle, now: DateTime<Utc>) -> Result<String, Error> {
        let expires = (now + self.ttl).timestamp();
        let payload = format!("{handle}.{expires}");
        let signature = hex::encode(self.mac_for(&payload)?.finalize().into_bytes());
        Ok(format!("{payload}.{signature}"))
    }

    /// Verify a token's signature and expiry, returning the embedded handle.
    ///
    /// Verification failures are indistinguishable on purpose: a malformed
    /// token, a bad signature, and an expired token all yield `None`.
    pub fn verify(&self, token: &str, now: DateTime<Utc>) -> Option<Handle> {
        let mut parts = token.splitn(3, '.');
        let handle = parts.next()?;
        let expires = parts.next()?;
        let signature = hex::decode(parts.next()?).ok()?;

        let payload = format!("{handle}.{expires}");
        let mac = self.mac_for(&payload).ok()?;
        // verify_slice compares in constant time.
        mac.verify_slice(&signature).ok()?;

        let expires: i64 = expires.parse().ok()?;
        if now.timestamp() > expires {
            return None;
        }
        Handle::new(handle).ok()
    }
}
