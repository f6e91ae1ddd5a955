//! Request Authentication
//!
//! Drives a bearer credential through the gate:
//! missing → invalid → unknown user → disabled → authenticated.
//! Only reads; nothing is refreshed or written here.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::token_issuer::TokenIssuer;
use crate::domain::repository::{AdminRepository, UserRepository};
use crate::error::{AuthError, AuthResult};

/// Identity attached to an authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub user_id: UserId,
    pub email: String,
}

pub struct AuthenticateUseCase<R>
where
    R: UserRepository + AdminRepository,
{
    repo: Arc<R>,
    tokens: Arc<TokenIssuer>,
}

impl<R> AuthenticateUseCase<R>
where
    R: UserRepository + AdminRepository,
{
    pub fn new(repo: Arc<R>, tokens: Arc<TokenIssuer>) -> Self {
        Self { repo, tokens }
    }

    pub async fn execute(&self, bearer: Option<&str>) -> AuthResult<AuthContext> {
        let token = bearer.ok_or(AuthError::MissingToken)?;
        let claims = self.tokens.verify_access(token)?;

        let user = self
            .repo
            .find_by_id(claims.user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        Ok(AuthContext {
            user_id: user.user_id,
            email: user.email.into_inner(),
        })
    }

    /// Authenticated and backed by an active admin account
    pub async fn execute_admin(&self, bearer: Option<&str>) -> AuthResult<AuthContext> {
        let ctx = self.execute(bearer).await?;
        if !self.repo.is_active_admin(ctx.user_id).await? {
            tracing::warn!(user_id = %ctx.user_id, "Admin route refused");
            return Err(AuthError::AdminRequired);
        }
        Ok(ctx)
    }
}
