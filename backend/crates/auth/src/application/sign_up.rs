//! Sign Up Use Case
//!
//! Creates a new user account and issues its first access token.
//! Registration does not open a ledger session.

use std::sync::Arc;

use platform::password::PasswordHasher;

use crate::application::config::AuthConfig;
use crate::application::token_issuer::TokenIssuer;
use crate::domain::entity::{NewUser, User};
use crate::domain::repository::UserRepository;
use crate::domain::value_object::{Email, RawPassword, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

pub struct SignUpInput {
    pub email: String,
    pub user_name: String,
    pub password: String,
    pub full_name: String,
    pub phone: Option<String>,
}

pub struct SignUpOutput {
    pub user: User,
    pub token: String,
}

pub struct SignUpUseCase<U>
where
    U: UserRepository,
{
    user_repo: Arc<U>,
    tokens: Arc<TokenIssuer>,
    config: Arc<AuthConfig>,
}

impl<U> SignUpUseCase<U>
where
    U: UserRepository,
{
    pub fn new(user_repo: Arc<U>, tokens: Arc<TokenIssuer>, config: Arc<AuthConfig>) -> Self {
        Self {
            user_repo,
            tokens,
            config,
        }
    }

    pub async fn execute(&self, input: SignUpInput) -> AuthResult<SignUpOutput> {
        let email =
            Email::new(input.email).map_err(|e| AuthError::invalid_field("email", e.to_string()))?;
        let user_name = UserName::new(&input.user_name)
            .map_err(|e| AuthError::invalid_field("username", e.to_string()))?;

        // Report which identifier collided; a concurrent insert still trips the constraint
        if self.user_repo.exists_by_email(&email).await? {
            return Err(AuthError::EmailTaken);
        }
        if self.user_repo.exists_by_user_name(&user_name).await? {
            return Err(AuthError::UserNameTaken);
        }

        let raw_password = RawPassword::new(input.password)
            .map_err(|e| AuthError::invalid_field("password", e.to_string()))?;
        let hasher = PasswordHasher::new(self.config.password_hash_cost)?;
        let password = UserPassword::from_raw(&raw_password, &hasher)?;

        let user = User::register(NewUser {
            email,
            user_name,
            password,
            full_name: input.full_name.trim().to_owned(),
            phone: input.phone,
        });
        self.user_repo.create(&user).await?;

        let issued = self
            .tokens
            .issue_access_token(user.user_id, user.email.as_str())?;

        tracing::info!(
            user_id = %user.user_id,
            user_name = %user.user_name,
            "User registered"
        );

        Ok(SignUpOutput {
            user,
            token: issued.token,
        })
    }
}
