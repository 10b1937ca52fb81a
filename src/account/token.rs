//! HMAC-SHA256 bearer tokens.
//!
//! A token binds a username to an expiry time:
//!
//! ```text
//! token     = "{username}.{expiry}.{signature}"
//! signature = hex(HMAC-SHA256(secret_key, "{username}:{expiry}"))
//! ```
//!
//! Usernames may contain dots, so tokens are split from the right.

use std::time::{Duration, SystemTime, UNIX_EPOCH};

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;

use crate::error::AccountError;

type HmacSha256 = Hmac<Sha256>;

/// Issues and verifies bearer tokens with a shared secret.
#[derive(Clone)]
pub struct TokenSigner {
    secret_key: Vec<u8>,
}

impl TokenSigner {
    pub fn new(secret_key: impl AsRef<[u8]>) -> Self {
        Self {
            secret_key: secret_key.as_ref().to_vec(),
        }
    }

    /// Issue a token for `username` valid for `ttl`.
    ///
    /// Returns the token and its expiry (Unix epoch seconds). The expiry
    /// saturates at `u64::MAX` rather than wrapping.
    pub fn issue(&self, username: &str, ttl: Duration) -> (String, u64) {
        let expiry = unix_now().saturating_add(ttl.as_secs());
        (self.issue_with_expiry(username, expiry), expiry)
    }

    /// Issue a token with an explicit expiry timestamp.
    pub fn issue_with_expiry(&self, username: &str, expiry: u64) -> String {
        let signature = self.compute_signature(username, expiry);
        format!("{}.{}.{}", username, expiry, signature)
    }

    /// Verify a token and return the username it was issued for.
    pub fn verify(&self, token: &str) -> Result<String, AccountError> {
        let mut parts = token.rsplitn(3, '.');
        let signature = parts.next().ok_or(AccountError::MalformedToken)?;
        let expiry = parts.next().ok_or(AccountError::MalformedToken)?;
        let username = parts.next().ok_or(AccountError::MalformedToken)?;

        if username.is_empty() {
            return Err(AccountError::MalformedToken);
        }
        let expiry: u64 = expiry.parse().map_err(|_| AccountError::MalformedToken)?;

        let current_time = unix_now();
        if current_time > expiry {
            return Err(AccountError::Expired {
                expired_at: expiry,
                current_time,
            });
        }

        let provided = hex::decode(signature).map_err(|_| AccountError::MalformedToken)?;
        let expected = self.mac(username, expiry);

        if provided.ct_eq(&expected).into() {
            Ok(username.to_string())
        } else {
            Err(AccountError::InvalidToken)
        }
    }

    /// Keyed digest of an arbitrary message, used for stored credentials.
    pub fn digest(&self, message: &str) -> Vec<u8> {
        let mut mac = self.new_mac();
        mac.update(message.as_bytes());
        mac.finalize().into_bytes().to_vec()
    }

    fn compute_signature(&self, username: &str, expiry: u64) -> String {
        hex::encode(self.mac(username, expiry))
    }

    fn mac(&self, username: &str, expiry: u64) -> Vec<u8> {
        self.digest(&format!("{}:{}", username, expiry))
    }

    fn new_mac(&self) -> HmacSha256 {
        HmacSha256::new_from_slice(&self.secret_key).expect("HMAC can take key of any size")
    }
}

fn unix_now() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
