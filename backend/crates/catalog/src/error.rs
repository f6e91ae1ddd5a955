//! Catalog Error Types

use axum::response::{IntoResponse, Response};
use kernel::error::{app_error::AppError, kind::ErrorKind};
use thiserror::Error;

pub type CatalogResult<T> = Result<T, CatalogError>;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("The specified restaurant does not exist")]
    RestaurantNotFound,

    /// Caller is authenticated but does not own the restaurant
    #[error("You do not have permission to access this restaurant")]
    NotOwner,

    #[error("Latitude and longitude are required")]
    MissingCoordinates,

    #[error("{0}")]
    InvalidQuery(&'static str),

    /// Upstream answered but had nothing inside the bounding box
    #[error("No restaurants were found in OpenStreetMap for {area}")]
    NothingFound { area: String },

    /// Designated owner account for imported rows is absent
    #[error("Please create an admin user first")]
    SyncOwnerMissing { user_name: String },

    #[error("Failed to fetch restaurants from OpenStreetMap")]
    Upstream(#[from] reqwest::Error),

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    App(#[from] AppError),

    #[error("Internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CatalogError::RestaurantNotFound | CatalogError::NothingFound { .. } => {
                ErrorKind::NotFound
            }
            CatalogError::NotOwner => ErrorKind::Forbidden,
            CatalogError::MissingCoordinates | CatalogError::InvalidQuery(_) => {
                ErrorKind::BadRequest
            }
            CatalogError::Upstream(_) => ErrorKind::BadGateway,
            CatalogError::App(e) => e.kind(),
            CatalogError::SyncOwnerMissing { .. }
            | CatalogError::Database(_)
            | CatalogError::Internal(_) => ErrorKind::InternalServerError,
        }
    }

    pub fn status_code(&self) -> u16 {
        self.kind().status_code()
    }

    fn log(&self) {
        match self {
            CatalogError::Database(e) => {
                tracing::error!(error = %e, "Catalog database error");
            }
            CatalogError::Upstream(e) => {
                tracing::error!(error = %e, "Overpass request failed");
            }
            CatalogError::SyncOwnerMissing { user_name } => {
                tracing::error!(user_name = %user_name, "Sync owner account not found");
            }
            CatalogError::Internal(msg) => {
                tracing::error!(message = %msg, "Catalog internal error");
            }
            CatalogError::NotOwner => {
                tracing::warn!("Restaurant access denied to non-owner");
            }
            _ => {
                tracing::debug!(error = %self, "Catalog error");
            }
        }
    }
}

impl From<CatalogError> for AppError {
    fn from(err: CatalogError) -> Self {
        let kind = err.kind();
        match err {
            CatalogError::App(e) => e,
            CatalogError::Database(e) => AppError::from(e),
            CatalogError::Upstream(e) => {
                AppError::bad_gateway("Failed to fetch restaurants from OpenStreetMap").with_source(e)
            }
            CatalogError::Internal(msg) => {
                AppError::internal("Internal server error").with_source(SourceMessage(msg))
            }
            other => AppError::new(kind, other.to_string()),
        }
    }
}

impl IntoResponse for CatalogError {
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
        assert_eq!(CatalogError::RestaurantNotFound.status_code(), 404);
        assert_eq!(CatalogError::NotOwner.status_code(), 403);
        assert_eq!(CatalogError::MissingCoordinates.status_code(), 400);
        assert_eq!(
            CatalogError::SyncOwnerMissing {
                user_name: "admin".into()
            }
            .status_code(),
            500
        );
    }

    #[test]
    fn test_sync_owner_message_is_visible() {
        let app: AppError = CatalogError::SyncOwnerMissing {
            user_name: "admin".into(),
        }
        .into();
        assert_eq!(app.message(), "Please create an admin user first");
    }

    #[test]
    fn test_nothing_found_names_area() {
        let app: AppError = CatalogError::NothingFound {
            area: "Bogotá".into(),
        }
        .into();
        assert_eq!(app.status_code(), 404);
        assert_eq!(
            app.message(),
            "No restaurants were found in OpenStreetMap for Bogotá"
        );
    }

    #[test]
    fn test_internal_hides_detail() {
        let app: AppError = CatalogError::Internal("listing vanished".into()).into();
        assert_eq!(app.message(), "Internal server error");
        assert!(app.source_chain().iter().any(|s| s.contains("listing vanished")));
    }
}
