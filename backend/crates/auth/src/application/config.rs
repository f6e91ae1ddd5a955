//! Application Configuration
//!
//! Configuration for the Auth application layer.

use std::fmt;

use chrono::TimeDelta;
use platform::password::DEFAULT_HASH_COST;
use platform::token::MIN_SECRET_LEN;

/// Default access token lifetime
pub const DEFAULT_ACCESS_TOKEN_TTL: TimeDelta = TimeDelta::days(7);

/// Session ledger handles always live 24 hours
pub const SESSION_TOKEN_TTL: TimeDelta = TimeDelta::hours(24);

#[derive(Clone)]
pub struct AuthConfig {
    /// HMAC key for bearer and session tokens
    pub token_secret: Vec<u8>,
    /// Access (bearer) token lifetime
    pub access_token_ttl: TimeDelta,
    /// Session handle lifetime
    pub session_token_ttl: TimeDelta,
    /// Argon2 iteration count for new hashes
    pub password_hash_cost: u32,
}

impl AuthConfig {
    pub fn new(token_secret: Vec<u8>) -> Self {
        Self {
            token_secret,
            access_token_ttl: DEFAULT_ACCESS_TOKEN_TTL,
            session_token_ttl: SESSION_TOKEN_TTL,
            password_hash_cost: DEFAULT_HASH_COST,
        }
    }

    /// Config with a random secret and the cheapest hash cost (for tests and local runs)
    pub fn development() -> Self {
        Self {
            password_hash_cost: 1,
            ..Self::new(platform::crypto::random_bytes(MIN_SECRET_LEN))
        }
    }

    pub fn with_access_token_ttl(mut self, ttl: TimeDelta) -> Self {
        self.access_token_ttl = ttl;
        self
    }

    pub fn with_password_hash_cost(mut self, cost: u32) -> Self {
        self.password_hash_cost = cost;
        self
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token_secret", &"[REDACTED]")
            .field("access_token_ttl", &self.access_token_ttl)
            .field("session_token_ttl", &self.session_token_ttl)
            .field("password_hash_cost", &self.password_hash_cost)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = AuthConfig::new(vec![1; 32]);
        assert_eq!(config.access_token_ttl, TimeDelta::days(7));
        assert_eq!(config.session_token_ttl, TimeDelta::hours(24));
        assert_eq!(config.password_hash_cost, 2);
    }

    #[test]
    fn test_debug_redacts_secret() {
        let config = AuthConfig::new(b"super-secret-signing-key-material".to_vec());
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
    }
}
