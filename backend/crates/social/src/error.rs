//! Social Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type SocialResult<T> = Result<T, SocialError>;

#[derive(Debug, Error)]
pub enum SocialError {
    #[error("The specified post does not exist")]
    PostNotFound,

    /// Private post requested by someone other than its author
    #[error("This post is not public")]
    PostNotPublic,

    #[error("You can only edit your own posts")]
    NotAuthorEdit,

    #[error("You can only delete your own posts")]
    NotAuthorDelete,

    #[error("The specified user does not exist")]
    UserNotFound,

    #[error("You cannot follow yourself")]
    SelfFollow,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl SocialError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            SocialError::PostNotFound | SocialError::UserNotFound => ErrorKind::NotFound,
            SocialError::PostNotPublic
            | SocialError::NotAuthorEdit
            | SocialError::NotAuthorDelete => ErrorKind::Forbidden,
            SocialError::SelfFollow => ErrorKind::BadRequest,
            SocialError::App(e) => e.kind(),
            SocialError::Database(_) | SocialError::Internal(_) => {
                ErrorKind::InternalServerError
            }
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    fn log(&self) {
        match self {
            SocialError::Database(e) => {
                tracing::error!(error = %e, "Social database error");
            }
            SocialError::Internal(msg) => {
                tracing::error!(message = %msg, "Social internal error");
            }
            SocialError::NotAuthorEdit | SocialError::NotAuthorDelete => {
                tracing::warn!(error = %self, "Post mutation denied to non-author");
            }
            _ => {
                tracing::debug!(error = %self, "Social error");
            }
        }
    }
}

impl From<SocialError> for AppError {
    fn from(err: SocialError) -> Self {
        let kind = err.kind();
        match err {
            SocialError::App(e) => e,
            SocialError::Database(e) => AppError::from(e),
            SocialError::Internal(msg) => {
                AppError::internal("Internal server error").with_source(SourceMessage(msg))
            }
            other => AppError::new(kind, other.to_string()),
        }
    }
}

impl IntoResponse for SocialError {
    fn into_response(self) -> Response {
        self.log();
        AppError::from(self).into_response()
    }
}

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
    fn test_status_codes() {
        assert_eq!(SocialError::PostNotFound.status_code(), 404);
        assert_eq!(SocialError::UserNotFound.status_code(), 404);
        assert_eq!(SocialError::PostNotPublic.status_code(), 403);
        assert_eq!(SocialError::NotAuthorEdit.status_code(), 403);
        assert_eq!(SocialError::NotAuthorDelete.status_code(), 403);
        assert_eq!(SocialError::SelfFollow.status_code(), 400);
    }

    #[test]
    fn test_author_messages_name_the_action() {
        let edit: AppError = SocialError::NotAuthorEdit.into();
        let delete: AppError = SocialError::NotAuthorDelete.into();
        assert_eq!(edit.message(), "You can only edit your own posts");
        assert_eq!(delete.message(), "You can only delete your own posts");
    }

    #[test]
    fn test_app_error_passes_through() {
        let err = SocialError::from(AppError::duplicate("A record with this value already exists"));
        assert_eq!(err.status_code(), 400);
    }
}
