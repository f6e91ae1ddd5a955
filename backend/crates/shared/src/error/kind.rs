//! Error Kind - Classification of errors
//!
//! Every [`ErrorKind`] pins one HTTP status. Clients of this API expect 400
//! for both field validation failures and uniqueness conflicts, so
//! `ValidationFailed` and `Duplicate` share the status of `BadRequest`.

use serde::Serialize;

/// ```rust
/// use kernel::error::kind::ErrorKind;
///
/// assert_eq!(ErrorKind::Duplicate.status_code(), 400);
/// assert_eq!(ErrorKind::BadGateway.to_string(), "Bad Gateway");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
#[non_exhaustive]
pub enum ErrorKind {
    BadRequest,
    /// Field list attached, see [`super::app_error::AppError::validation`]
    ValidationFailed,
    /// Unique constraint hit (email, username, ...)
    Duplicate,
    Unauthorized,
    Forbidden,
    NotFound,
    InternalServerError,
    /// Upstream data source failed (OpenStreetMap import)
    BadGateway,
    /// Database pool exhausted or shutting down
    ServiceUnavailable,
}

impl ErrorKind {
    #[inline]
    pub const fn status_code(&self) -> u16 {
        match self {
            Self::BadRequest | Self::ValidationFailed | Self::Duplicate => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::InternalServerError => 500,
            Self::BadGateway => 502,
            Self::ServiceUnavailable => 503,
        }
    }

    #[inline]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::BadRequest => "Bad Request",
            Self::ValidationFailed => "Validation Failed",
            Self::Duplicate => "Duplicate",
            Self::Unauthorized => "Unauthorized",
            Self::Forbidden => "Forbidden",
            Self::NotFound => "Not Found",
            Self::InternalServerError => "Internal Server Error",
            Self::BadGateway => "Bad Gateway",
            Self::ServiceUnavailable => "Service Unavailable",
        }
    }

    /// 5xx; these get logged with their source chain
    #[inline]
    pub const fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    #[inline]
    pub const fn is_client_error(&self) -> bool {
        matches!(self.status_code(), 400..=499)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_contract_statuses() {
        let cases = [
            (ErrorKind::ValidationFailed, 400),
            (ErrorKind::Duplicate, 400),
            (ErrorKind::Unauthorized, 401),
            (ErrorKind::Forbidden, 403),
            (ErrorKind::NotFound, 404),
            (ErrorKind::BadGateway, 502),
            (ErrorKind::ServiceUnavailable, 503),
        ];
        for (kind, status) in cases {
            assert_eq!(kind.status_code(), status, "{kind}");
        }
    }

    #[test]
    fn test_server_and_client_split() {
        assert!(ErrorKind::Duplicate.is_client_error());
        assert!(!ErrorKind::Duplicate.is_server_error());
        assert!(ErrorKind::BadGateway.is_server_error());
        assert!(!ErrorKind::InternalServerError.is_client_error());
    }

    #[test]
    fn test_serializes_screaming_snake() {
        let json = serde_json::to_string(&ErrorKind::ValidationFailed).unwrap();
        assert_eq!(json, "\"VALIDATION_FAILED\"");
    }
}
