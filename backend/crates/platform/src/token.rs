//! Signed Bearer Tokens
//!
//! Compact, self-contained tokens of the form
//!
//! ```text
//! base64url(json claims) "." base64url(HMAC-SHA256(key, first segment))
//! ```
//!
//! Every token carries `iat`, `exp` (unix seconds) and a random `jti`
//! next to the caller's own claims, so two tokens issued in the same second
//! for the same subject still differ.
//!
//! Verification order: structure, signature, expiry. A token is never
//! decoded as claims before its signature has been checked.

use std::fmt;

use chrono::{DateTime, TimeDelta, Utc};
use serde::{Deserialize, Serialize, de::DeserializeOwned};
use thiserror::Error;
use zeroize::Zeroizing;

use crate::crypto::{from_base64url, hmac_sha256, hmac_sha256_verify, random_token, to_base64url};

/// Minimum signing key length in bytes
pub const MIN_SECRET_LEN: usize = 32;

/// Entropy of the `jti` claim in bytes
const JTI_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TokenError {
    #[error("Signing key must be at least {MIN_SECRET_LEN} bytes")]
    WeakSecret,

    #[error("Token is malformed")]
    Malformed,

    #[error("Token signature mismatch")]
    BadSignature,

    #[error("Token has expired")]
    Expired,

    #[error("Token claims could not be encoded: {0}")]
    Encode(String),
}

/// Claims wrapper adding the registered fields
#[derive(Serialize, Deserialize)]
struct Signed<C> {
    #[serde(flatten)]
    claims: C,
    iat: i64,
    exp: i64,
    jti: String,
}

/// Freshly signed token with its expiry
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// HMAC-SHA256 token signer/verifier
///
/// ## Examples
/// ```rust
/// use chrono::TimeDelta;
/// use platform::token::TokenCodec;
/// use serde::{Deserialize, Serialize};
///
/// #[derive(Serialize, Deserialize)]
/// struct Claims { sub: String }
///
/// let codec = TokenCodec::new(b"0123456789abcdef0123456789abcdef".to_vec()).unwrap();
/// let issued = codec.sign(&Claims { sub: "42".into() }, TimeDelta::hours(1)).unwrap();
/// let claims: Claims = codec.verify(&issued.token).unwrap();
/// assert_eq!(claims.sub, "42");
/// ```
#[derive(Clone)]
pub struct TokenCodec {
    key: Zeroizing<Vec<u8>>,
}

impl TokenCodec {
    pub fn new(key: Vec<u8>) -> Result<Self, TokenError> {
        if key.len() < MIN_SECRET_LEN {
            return Err(TokenError::WeakSecret);
        }
        Ok(Self {
            key: Zeroizing::new(key),
        })
    }

    /// Sign `claims`, valid for `ttl` from now
    pub fn sign<C: Serialize>(&self, claims: &C, ttl: TimeDelta) -> Result<IssuedToken, TokenError> {
        self.sign_at(claims, ttl, Utc::now())
    }

    /// Sign `claims` as if issued at `now`
    pub fn sign_at<C: Serialize>(
        &self,
        claims: &C,
        ttl: TimeDelta,
        now: DateTime<Utc>,
    ) -> Result<IssuedToken, TokenError> {
        let expires_at = now + ttl;
        let signed = Signed {
            claims,
            iat: now.timestamp(),
            exp: expires_at.timestamp(),
            jti: random_token(JTI_LEN),
        };
        let json = serde_json::to_vec(&signed).map_err(|e| TokenError::Encode(e.to_string()))?;

        let payload = to_base64url(&json);
        let mac = hmac_sha256(&self.key, payload.as_bytes());
        Ok(IssuedToken {
            token: format!("{payload}.{}", to_base64url(&mac)),
            expires_at,
        })
    }

    /// Verify a token and return its claims
    pub fn verify<C: DeserializeOwned>(&self, token: &str) -> Result<C, TokenError> {
        self.verify_at(token, Utc::now())
    }

    pub fn verify_at<C: DeserializeOwned>(
        &self,
        token: &str,
        now: DateTime<Utc>,
    ) -> Result<C, TokenError> {
        let (payload, mac) = token.split_once('.').ok_or(TokenError::Malformed)?;
        if payload.is_empty() || mac.contains('.') {
            return Err(TokenError::Malformed);
        }
        let mac = from_base64url(mac).map_err(|_| TokenError::Malformed)?;

        if !hmac_sha256_verify(&self.key, payload.as_bytes(), &mac) {
            return Err(TokenError::BadSignature);
        }

        let json = from_base64url(payload).map_err(|_| TokenError::Malformed)?;
        let signed: Signed<C> = serde_json::from_slice(&json).map_err(|_| TokenError::Malformed)?;

        if signed.exp <= now.timestamp() {
            return Err(TokenError::Expired);
        }
        Ok(signed.claims)
    }
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("key", &"[REDACTED]")
            .finish()
    }
}

/// Parse a duration such as `7d`, `12h`, `30m`, `45s` or bare seconds
pub fn parse_ttl(raw: &str) -> Option<TimeDelta> {
    let raw = raw.trim();
    let split = raw
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(raw.len());
    let (digits, unit) = raw.split_at(split);
    let amount: i64 = digits.parse().ok()?;
    if amount <= 0 {
        return None;
    }
    match unit {
        "" | "s" => TimeDelta::try_seconds(amount),
        "m" => TimeDelta::try_minutes(amount),
        "h" => TimeDelta::try_hours(amount),
        "d" => TimeDelta::try_days(amount),
        "w" => TimeDelta::try_weeks(amount),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Claims {
        sub: String,
        email: String,
    }

    fn codec() -> TokenCodec {
        TokenCodec::new(vec![7u8; 32]).unwrap()
    }

    fn claims() -> Claims {
        Claims {
            sub: "user-1".into(),
            email: "ana@example.com".into(),
        }
    }

    #[test]
    fn test_weak_secret_rejected() {
        assert_eq!(TokenCodec::new(vec![1u8; 31]).unwrap_err(), TokenError::WeakSecret);
    }

    #[test]
    fn test_sign_and_verify() {
        let issued = codec().sign(&claims(), TimeDelta::days(7)).unwrap();
        let back: Claims = codec().verify(&issued.token).unwrap();
        assert_eq!(back, claims());
    }

    #[test]
    fn test_tokens_are_unique() {
        let now = Utc::now();
        let a = codec().sign_at(&claims(), TimeDelta::hours(1), now).unwrap();
        let b = codec().sign_at(&claims(), TimeDelta::hours(1), now).unwrap();
        assert_ne!(a.token, b.token);
    }

    #[test]
    fn test_expired() {
        let now = Utc::now();
        let issued = codec().sign_at(&claims(), TimeDelta::hours(24), now).unwrap();
        assert_eq!(issued.expires_at, now + TimeDelta::hours(24));

        let later = now + TimeDelta::hours(25);
        let err = codec().verify_at::<Claims>(&issued.token, later).unwrap_err();
        assert_eq!(err, TokenError::Expired);
    }

    #[test]
    fn test_tampered_payload() {
        let issued = codec().sign(&claims(), TimeDelta::hours(1)).unwrap();
        let (_, mac) = issued.token.split_once('.').unwrap();
        let forged_claims = Claims {
            sub: "admin".into(),
            email: "ana@example.com".into(),
        };
        let forged = format!(
            "{}.{mac}",
            to_base64url(&serde_json::to_vec(&forged_claims).unwrap())
        );
        assert_eq!(codec().verify::<Claims>(&forged).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_other_key() {
        let issued = codec().sign(&claims(), TimeDelta::hours(1)).unwrap();
        let other = TokenCodec::new(vec![8u8; 32]).unwrap();
        assert_eq!(other.verify::<Claims>(&issued.token).unwrap_err(), TokenError::BadSignature);
    }

    #[test]
    fn test_malformed() {
        for raw in ["", "abc", ".abc", "a.b.c", "abc.!!!"] {
            assert_eq!(codec().verify::<Claims>(raw).unwrap_err(), TokenError::Malformed, "{raw}");
        }
    }

    #[test]
    fn test_parse_ttl() {
        assert_eq!(parse_ttl("7d"), Some(TimeDelta::days(7)));
        assert_eq!(parse_ttl("12h"), Some(TimeDelta::hours(12)));
        assert_eq!(parse_ttl("3600"), Some(TimeDelta::seconds(3600)));
        assert_eq!(parse_ttl("0"), None);
        assert_eq!(parse_ttl("7y"), None);
        assert_eq!(parse_ttl("d"), None);
    }
}
