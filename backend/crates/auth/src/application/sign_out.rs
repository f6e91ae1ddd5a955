//! Sign Out Use Case
//!
//! Marks the caller's matching ledger sessions inactive. Idempotent:
//! an unknown, stale or absent session token is not an error.

use std::sync::Arc;

use kernel::id::UserId;

use crate::domain::repository::AuthSessionRepository;
use crate::error::AuthResult;

pub struct SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    session_repo: Arc<S>,
}

impl<S> SignOutUseCase<S>
where
    S: AuthSessionRepository,
{
    pub fn new(session_repo: Arc<S>) -> Self {
        Self { session_repo }
    }

    /// Returns the number of sessions deactivated
    pub async fn execute(&self, user_id: UserId, session_token: Option<&str>) -> AuthResult<u64> {
        let Some(token) = session_token.filter(|t| !t.is_empty()) else {
            tracing::info!(user_id = %user_id, "User logged out without session token");
            return Ok(0);
        };

        let deactivated = self.session_repo.deactivate(user_id, token).await?;

        tracing::info!(
            user_id = %user_id,
            sessions_deactivated = deactivated,
            "User logged out"
        );
        Ok(deactivated)
    }
}
