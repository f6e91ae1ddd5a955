//! Token Issuer
//!
//! Access tokens authenticate requests; session tokens are revocable
//! handles stored in the session ledger. Both are signed with the same
//! key but carry a distinct `typ`, so one can never stand in for the other.

use chrono::{DateTime, TimeDelta, Utc};
use kernel::id::UserId;
use platform::token::{IssuedToken, TokenCodec, TokenError};
use serde::{Deserialize, Serialize};

use crate::application::config::AuthConfig;
use crate::domain::value_object::ClientPlatform;
use crate::error::{AuthError, AuthResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
enum TokenType {
    Access,
    Session,
}

/// Claims carried by an access token
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AccessClaims {
    pub user_id: UserId,
    pub email: String,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct AccessPayload {
    typ: TokenType,
    #[serde(flatten)]
    claims: AccessClaims,
}

#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SessionPayload {
    typ: TokenType,
    user_id: UserId,
    platform: ClientPlatform,
}

#[derive(Debug, Clone)]
pub struct TokenIssuer {
    codec: TokenCodec,
    access_ttl: TimeDelta,
    session_ttl: TimeDelta,
}

impl TokenIssuer {
    /// Fails when the signing key is too short
    pub fn new(config: &AuthConfig) -> Result<Self, TokenError> {
        Ok(Self {
            codec: TokenCodec::new(config.token_secret.clone())?,
            access_ttl: config.access_token_ttl,
            session_ttl: config.session_token_ttl,
        })
    }

    pub fn issue_access_token(&self, user_id: UserId, email: &str) -> AuthResult<IssuedToken> {
        let payload = AccessPayload {
            typ: TokenType::Access,
            claims: AccessClaims {
                user_id,
                email: email.to_owned(),
            },
        };
        Ok(self.codec.sign(&payload, self.access_ttl)?)
    }

    pub fn issue_session_token(
        &self,
        user_id: UserId,
        platform: ClientPlatform,
    ) -> AuthResult<IssuedToken> {
        self.issue_session_token_at(user_id, platform, Utc::now())
    }

    pub fn issue_session_token_at(
        &self,
        user_id: UserId,
        platform: ClientPlatform,
        now: DateTime<Utc>,
    ) -> AuthResult<IssuedToken> {
        let payload = SessionPayload {
            typ: TokenType::Session,
            user_id,
            platform,
        };
        Ok(self.codec.sign_at(&payload, self.session_ttl, now)?)
    }

    /// Verify an access token; every failure collapses to `InvalidToken`
    pub fn verify_access(&self, token: &str) -> AuthResult<AccessClaims> {
        self.verify_access_at(token, Utc::now())
    }

    pub fn verify_access_at(&self, token: &str, now: DateTime<Utc>) -> AuthResult<AccessClaims> {
        let payload: AccessPayload = self.codec.verify_at(token, now).map_err(|e| {
            tracing::debug!(error = %e, "Rejected access token");
            AuthError::InvalidToken
        })?;
        if payload.typ != TokenType::Access {
            return Err(AuthError::InvalidToken);
        }
        Ok(payload.claims)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn issuer() -> TokenIssuer {
        TokenIssuer::new(&AuthConfig::new(vec![3u8; 32])).unwrap()
    }

    #[test]
    fn test_weak_secret() {
        assert!(matches!(
            TokenIssuer::new(&AuthConfig::new(b"short".to_vec())),
            Err(TokenError::WeakSecret)
        ));
    }

    #[test]
    fn test_access_token_subject() {
        let user_id = UserId::new();
        let issued = issuer().issue_access_token(user_id, "ana@example.com").unwrap();
        let claims = issuer().verify_access(&issued.token).unwrap();
        assert_eq!(claims.user_id, user_id);
        assert_eq!(claims.email, "ana@example.com");
    }

    #[test]
    fn test_access_token_expires_after_configured_ttl() {
        let issuer = TokenIssuer::new(
            &AuthConfig::new(vec![3u8; 32]).with_access_token_ttl(TimeDelta::hours(1)),
        )
        .unwrap();
        let issued = issuer.issue_access_token(UserId::new(), "a@b.co").unwrap();
        let later = Utc::now() + TimeDelta::hours(2);
        assert!(matches!(
            issuer.verify_access_at(&issued.token, later),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_session_token_lives_24_hours() {
        let now = Utc::now();
        let issued = issuer()
            .issue_session_token_at(UserId::new(), ClientPlatform::Mobile, now)
            .unwrap();
        assert_eq!(issued.expires_at, now + TimeDelta::hours(24));
    }

    #[test]
    fn test_session_token_is_not_an_access_token() {
        let issued = issuer()
            .issue_session_token(UserId::new(), ClientPlatform::WebAdmin)
            .unwrap();
        assert!(matches!(
            issuer().verify_access(&issued.token),
            Err(AuthError::InvalidToken)
        ));
    }

    #[test]
    fn test_garbage_rejected() {
        assert!(matches!(issuer().verify_access("nope"), Err(AuthError::InvalidToken)));
    }
}
