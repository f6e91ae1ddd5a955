//! Auth Error Types
//!
//! Auth-specific error variants that integrate with the unified
//! `kernel::error::AppError` envelope.

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use kernel::validation::FieldError;
use platform::password::PasswordHashError;
use platform::token::TokenError;
use thiserror::Error;

/// Auth-specific result type alias
pub type AuthResult<T> = Result<T, AuthError>;

#[derive(Debug, Error)]
pub enum AuthError {
    /// No usable `Authorization: Bearer` header
    #[error("missing token")]
    MissingToken,

    /// Signature or expiry check failed
    #[error("invalid or expired token")]
    InvalidToken,

    /// Token subject no longer exists
    #[error("user not found")]
    UserNotFound,

    #[error("account disabled")]
    AccountDisabled,

    /// Unknown email and wrong password share this variant
    #[error("Email or password is incorrect")]
    InvalidCredentials,

    #[error("Admin access required")]
    AdminRequired,

    #[error("Email already registered")]
    EmailTaken,

    #[error("Username already taken")]
    UserNameTaken,

    /// Caller's own record vanished between authentication and lookup
    #[error("User not found")]
    ProfileNotFound,

    /// Domain rule rejected a single input field
    #[error("{message}")]
    InvalidField {
        field: &'static str,
        message: String,
    },

    #[error("Token error: {0}")]
    Token(#[from] TokenError),

    #[error("Password hashing error: {0}")]
    PasswordHash(#[from] PasswordHashError),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Already-classified error from a shared layer
    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl AuthError {
    pub fn invalid_field(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidField {
            field,
            message: message.into(),
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            AuthError::MissingToken
            | AuthError::InvalidToken
            | AuthError::UserNotFound
            | AuthError::AccountDisabled
            | AuthError::InvalidCredentials => ErrorKind::Unauthorized,
            AuthError::AdminRequired => ErrorKind::Forbidden,
            AuthError::EmailTaken | AuthError::UserNameTaken => ErrorKind::Duplicate,
            AuthError::ProfileNotFound => ErrorKind::NotFound,
            AuthError::InvalidField { .. } => ErrorKind::ValidationFailed,
            AuthError::App(e) => e.kind(),
            AuthError::Database(_)
            | AuthError::Token(_)
            | AuthError::PasswordHash(_)
            | AuthError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    /// Log the error with appropriate level
    fn log(&self) {
        match self {
            AuthError::Database(e) => {
                tracing::error!(error = %e, "Auth database error");
            }
            AuthError::Token(e) => {
                tracing::error!(error = %e, "Token signing failed");
            }
            AuthError::PasswordHash(e) => {
                tracing::error!(error = %e, "Password hashing failed");
            }
            AuthError::Internal(msg) => {
                tracing::error!(message = %msg, "Auth internal error");
            }
            AuthError::InvalidCredentials => {
                tracing::warn!("Invalid login attempt");
            }
            AuthError::AccountDisabled => {
                tracing::warn!("Request from disabled account");
            }
            _ => {
                tracing::debug!(error = %self, "Auth error");
            }
        }
    }
}

impl From<AuthError> for AppError {
    fn from(err: AuthError) -> Self {
        let kind = err.kind();
        match err {
            AuthError::App(e) => e,
            // SQLSTATE classification lives in kernel
            AuthError::Database(e) => AppError::from(e),
            AuthError::InvalidField { field, message } => {
                AppError::validation(vec![FieldError::new(field, message)])
            }
            AuthError::Token(_) | AuthError::PasswordHash(_) | AuthError::Internal(_) => {
                let message = err.to_string();
                AppError::internal("Internal server error").with_source(SourceMessage(message))
            }
            other => AppError::new(kind, other.to_string()),
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

/// Carries an internal message into the error source chain
#[derive(Debug)]
struct SourceMessage(String);

impl std::fmt::Display for SourceMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for SourceMessage {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_gate_errors_are_unauthorized() {
        for err in [
            AuthError::MissingToken,
            AuthError::InvalidToken,
            AuthError::UserNotFound,
            AuthError::AccountDisabled,
            AuthError::InvalidCredentials,
        ] {
            assert_eq!(err.status_code(), 401, "{err}");
        }
    }

    #[test]
    fn test_duplicates_are_bad_request() {
        let app: AppError = AuthError::EmailTaken.into();
        assert_eq!(app.status_code(), 400);
        assert_eq!(app.message(), "Email already registered");

        let app: AppError = AuthError::UserNameTaken.into();
        assert_eq!(app.message(), "Username already taken");
    }

    #[test]
    fn test_internal_hides_detail() {
        let app: AppError = AuthError::Internal("pool exploded".into()).into();
        assert_eq!(app.status_code(), 500);
        assert_eq!(app.message(), "Internal server error");
        assert!(app.source_chain().iter().any(|s| s.contains("pool exploded")));
    }

    #[test]
    fn test_invalid_field_becomes_validation() {
        let app: AppError = AuthError::invalid_field("username", "Username must not exceed 30 characters").into();
        assert_eq!(app.kind(), ErrorKind::ValidationFailed);
        assert_eq!(app.field_errors()[0].field, "username");
    }

    #[test]
    fn test_row_not_found_maps_through_kernel() {
        let app: AppError = AuthError::Database(sqlx::Error::RowNotFound).into();
        assert_eq!(app.status_code(), 404);
    }
}
