//! Refresh Token Use Case
//!
//! Re-checks the caller and issues a new access token. The session
//! ledger is left untouched.

use std::sync::Arc;

use kernel::id::UserId;

use crate::application::token_issuer::TokenIssuer;
use crate::domain::repository::UserRepository;
use crate::error::{AuthError, AuthResult};

pub struct RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenIssuer>,
}

impl<U> RefreshTokenUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenIssuer>) -> Self {
        Self { user_repo, tokens }
    }

    pub async fn execute(&self, user_id: UserId) -> AuthResult<String> {
        let user = self
            .user_repo
            .find_by_id(user_id)
            .await?
            .ok_or(AuthError::UserNotFound)?;
        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let issued = self
            .tokens
            .issue_access_token(user.user_id, user.email.as_str())?;
        tracing::debug!(user_id = %user.user_id, "Access token refreshed");
        Ok(issued.token)
    }
}
