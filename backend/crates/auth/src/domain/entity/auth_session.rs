//! Auth Session Entity
//!
//! Ledger row for an issued session token. Logout flips `is_active`;
//! rows are never removed by logout.

use chrono::{DateTime, Utc};
use kernel::id::{SessionId, UserId};
use serde_json::Value;

use crate::domain::value_object::ClientPlatform;

#[derive(Debug, Clone)]
pub struct AuthSession {
    pub session_id: SessionId,
    pub user_id: UserId,
    /// Opaque handle handed to the client, distinct from the bearer token
    pub session_token: String,
    pub platform: ClientPlatform,
    /// Client-supplied device metadata (JSON object)
    pub device_info: Value,
    pub ip_address: Option<String>,
    pub expires_at: DateTime<Utc>,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl AuthSession {
    /// Open a new active session
    ///
    /// Expiry comes from the issued token so both always agree.
    pub fn open(
        user_id: UserId,
        session_token: String,
        platform: ClientPlatform,
        device_info: Value,
        ip_address: Option<String>,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            session_id: SessionId::new(),
            user_id,
            session_token,
            platform,
            device_info,
            ip_address,
            expires_at,
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at <= now
    }
}
