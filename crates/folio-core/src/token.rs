//! Bearer token codec.
//!
//! A token is `hex(HMAC-SHA256(secret, credential))`. It is deterministic,
//! fixed-length (64 hex characters), and never reveals the credential.
//! Tokens are not stored anywhere: the server verifies a presented token by
//! deriving the expected one from the currently resolved credential, so a
//! token stops working the moment the credential changes. There is no expiry
//! and no per-session identity.
//!
//! Comparison uses `subtle::ConstantTimeEq`.

use std::fmt;

use hmac::{Hmac, Mac};
use sha2::Sha256;
use subtle::ConstantTimeEq;
use zeroize::Zeroizing;

use crate::error::TokenError;

type HmacSha256 = Hmac<Sha256>;

/// Length of a derived token in hex characters.
pub const TOKEN_LEN: usize = 64;

/// The token-signing secret. Zeroized on drop, redacted in `Debug`.
#[derive(Clone)]
pub struct TokenSecret(Zeroizing<Vec<u8>>);

impl TokenSecret {
    /// Wrap secret bytes.
    #[must_use]
    pub fn new(bytes: impl Into<Vec<u8>>) -> Self {
        Self(Zeroizing::new(bytes.into()))
    }

    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}

impl fmt::Debug for TokenSecret {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("TokenSecret").field(&"[REDACTED]").finish()
    }
}

/// Derive the bearer token for `credential` under `secret`.
///
/// # Errors
///
/// Returns [`TokenError::InvalidSecret`] if the MAC rejects the key. HMAC
/// accepts keys of any length, so this only surfaces a broken primitive.
pub fn derive_token(credential: &str, secret: &[u8]) -> Result<String, TokenError> {
    let mut mac = HmacSha256::new_from_slice(secret).map_err(|e| TokenError::InvalidSecret {
        reason: e.to_string(),
    })?;
    mac.update(credential.as_bytes());
    Ok(hex::encode(mac.finalize().into_bytes()))
}

/// Constant-time string equality. Lengths are compared in the clear.
#[must_use]
pub fn constant_time_eq(a: &str, b: &str) -> bool {
    a.as_bytes().ct_eq(b.as_bytes()).into()
}

/// Issues and verifies bearer tokens under one secret.
#[derive(Debug, Clone)]
pub struct TokenCodec {
    secret: TokenSecret,
}

impl TokenCodec {
    /// Create a codec for the given secret.
    #[must_use]
    pub fn new(secret: TokenSecret) -> Self {
        Self { secret }
    }

    /// Derive the token for `credential`.
    ///
    /// # Errors
    ///
    /// See [`derive_token`].
    pub fn derive(&self, credential: &str) -> Result<String, TokenError> {
        derive_token(credential, self.secret.as_bytes())
    }

    /// Whether `presented` is the token for `credential`.
    ///
    /// # Errors
    ///
    /// See [`derive_token`].
    pub fn verify(&self, credential: &str, presented: &str) -> Result<bool, TokenError> {
        let expected = Zeroizing::new(self.derive(credential)?);
        Ok(constant_time_eq(&expected, presented))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn codec(secret: &str) -> TokenCodec {
        TokenCodec::new(TokenSecret::new(secret.as_bytes()))
    }

    #[test]
    fn derive_is_deterministic() {
        let a = codec("s3cret").derive("admin123").unwrap();
        let b = codec("s3cret").derive("admin123").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn token_is_fixed_length_hex_and_not_the_credential() {
        let token = codec("s3cret").derive("admin123").unwrap();
        assert_eq!(token.len(), TOKEN_LEN);
        assert!(token.chars().all(|c| c.is_ascii_hexdigit()));
        assert!(!token.contains("admin123"));
    }

    #[test]
    fn changing_credential_changes_token() {
        let c = codec("s3cret");
        assert_ne!(c.derive("admin123").unwrap(), c.derive("admin124").unwrap());
    }

    #[test]
    fn changing_secret_changes_token() {
        assert_ne!(
            codec("s3cret").derive("admin123").unwrap(),
            codec("other").derive("admin123").unwrap()
        );
    }

    #[test]
    fn matches_rfc4231_test_case_2() {
        let token = derive_token("what do ya want for nothing?", b"Jefe").unwrap();
        assert_eq!(
            token,
            "5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843"
        );
    }

    #[test]
    fn verify_accepts_derived_token_only() {
        let c = codec("s3cret");
        let token = c.derive("admin123").unwrap();
        assert!(c.verify("admin123", &token).unwrap());
        assert!(!c.verify("admin123", "admin123").unwrap());
        assert!(!c.verify("changed", &token).unwrap());
        assert!(!c.verify("admin123", "").unwrap());
    }

    #[test]
    fn constant_time_eq_matches_plain_equality() {
        assert!(constant_time_eq("abc", "abc"));
        assert!(!constant_time_eq("abc", "abd"));
        assert!(!constant_time_eq("abc", "abcd"));
        assert!(constant_time_eq("", ""));
    }

    #[test]
    fn secret_debug_is_redacted() {
        let debug = format!("{:?}", TokenSecret::new("hunter2"));
        assert!(debug.contains("[REDACTED]"));
        assert!(!debug.contains("hunter2"));
    }
}
