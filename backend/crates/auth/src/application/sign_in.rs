//! Sign In Use Case
//!
//! Verifies credentials, opens a ledger session and issues both tokens.

use std::sync::Arc;

use chrono::Utc;
use serde_json::Value;

use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::{AuthSession, User};
use crate::domain::repository::{AuthSessionRepository, UserRepository};
use crate::domain::value_object::{ClientPlatform, Email, RawPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignInInput {
    pub email: String,
    pub password: String,
    pub platform: ClientPlatform,
    pub device_info: Option<Value>,
    pub ip_address: Option<String>,
}

pub struct SignInOutput {
    pub user: User,
    pub token: String,
    pub session_token: String,
    pub platform: ClientPlatform,
}

pub struct SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    user_repo: Arc<U>,
    session_repo: Arc<S>,
    tokens: Arc<TokenIssuer>,
}

impl<U, S> SignInUseCase<U, S>
where
    U: UserRepository,
    S: AuthSessionRepository,
{
    pub fn new(user_repo: Arc<U>, session_repo: Arc<S>, tokens: Arc<TokenIssuer>) -> Self {
        Self {
            user_repo,
            session_repo,
            tokens,
        }
    }

    pub async fn execute(&self, input: SignInInput) -> AuthResult<SignInOutput> {
        // A malformed address can't match any stored one
        let email = Email::new(input.email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .user_repo
            .find_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        // Disabled accounts are reported before the password is checked
        if !user.can_login() {
            return Err(AuthError::AccountDisabled);
        }

        let raw_password = RawPassword::for_login(input.password);
        if !user.password.verify(&raw_password) {
            tracing::warn!(user_id = %user.user_id, "Password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let access = self
            .tokens
            .issue_access_token(user.user_id, user.email.as_str())?;
        let session_token = self
            .tokens
            .issue_session_token(user.user_id, input.platform)?;

        let session = AuthSession::open(
            user.user_id,
            session_token.token,
            input.platform,
            input.device_info.unwrap_or_else(|| Value::Object(Default::default())),
            input.ip_address,
            session_token.expires_at,
        );
        self.session_repo.create(&session).await?;

        let now = Utc::now();
        self.user_repo.touch(user.user_id, now).await?;

        tracing::info!(
            user_id = %user.user_id,
            session_id = %session.session_id,
            platform = %input.platform,
            "User logged in"
        );

        let mut user = user;
        user.updated_at = now;

        Ok(SignInOutput {
            user,
            token: access.token,
            session_token: session.session_token,
            platform: input.platform,
        })
    }
}
