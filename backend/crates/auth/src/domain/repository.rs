//! Repository Traits
//!
//! Interfaces for data persistence. Implementations live in the
//! infrastructure layer.

use chrono::{DateTime, Utc};
use kernel::id::UserId;

use crate::domain::entity::{AuthSession, User};
use crate::domain::value_object::{Email, UserName};
use crate::error::AuthResult;

/// Credential store
#[trait_variant::make(UserRepository: Send)]
pub trait LocalUserRepository {
    /// Insert a new user; uniqueness is enforced by the store
    async fn create(&self, user: &User) -> AuthResult<()>;

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>>;

    /// Exact, case-sensitive match
    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>>;

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool>;

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool>;

    /// Bump `updated_at`
    async fn touch(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()>;
}

/// Administrative accounts
#[trait_variant::make(AdminRepository: Send)]
pub trait LocalAdminRepository {
    /// True when an admin row exists and its linked user is active
    async fn is_active_admin(&self, user_id: UserId) -> AuthResult<bool>;
}

/// Session ledger
#[trait_variant::make(AuthSessionRepository: Send)]
pub trait LocalAuthSessionRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()>;

    /// Deactivate the caller's active sessions carrying `session_token`
    async fn deactivate(&self, user_id: UserId, session_token: &str) -> AuthResult<u64>;

    /// Deactivate every session that expired before `now`
    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AuthResult<u64>;
}
