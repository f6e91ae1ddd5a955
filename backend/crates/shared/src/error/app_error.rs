//! Application Error - Unified error type for the application
//!
//! Every bounded context converts its own `thiserror` enum into [`AppError`]
//! at the HTTP edge; `IntoResponse` lives next to the envelope in
//! [`super::envelope`].

use std::borrow::Cow;
use std::error::Error;
use std::fmt;

use super::kind::ErrorKind;
use crate::validation::FieldError;

/// Client-facing error: kind (status), message, optional field list, and an
/// optional source that only ever reaches logs and non-production `stack`.
///
/// ```rust
/// use kernel::error::{app_error::AppError, kind::ErrorKind};
///
/// let err = AppError::forbidden("You can only edit your own posts");
/// assert_eq!(err.kind(), ErrorKind::Forbidden);
/// assert_eq!(err.status_code(), 403);
/// ```
pub struct AppError {
    kind: ErrorKind,
    message: Cow<'static, str>,
    errors: Vec<FieldError>,
    source: Option<Box<dyn Error + Send + Sync + 'static>>,
}

pub type AppResult<T> = Result<T, AppError>;

impl AppError {
    #[inline]
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
            errors: Vec::new(),
            source: None,
        }
    }

    #[inline]
    pub fn bad_request(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadRequest, message)
    }

    /// Validation failure with the generic message; details travel in `errors`
    #[inline]
    pub fn validation(errors: Vec<FieldError>) -> Self {
        Self::new(
            ErrorKind::ValidationFailed,
            "Please check your input and try again",
        )
        .with_field_errors(errors)
    }

    #[inline]
    pub fn duplicate(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Duplicate, message)
    }

    #[inline]
    pub fn unauthorized(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Unauthorized, message)
    }

    #[inline]
    pub fn forbidden(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Forbidden, message)
    }

    #[inline]
    pub fn not_found(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    #[inline]
    pub fn internal(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::InternalServerError, message)
    }

    #[inline]
    pub fn bad_gateway(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::BadGateway, message)
    }

    #[inline]
    pub fn service_unavailable(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::ServiceUnavailable, message)
    }

    #[inline]
    pub fn with_field_errors(mut self, errors: Vec<FieldError>) -> Self {
        self.errors = errors;
        self
    }

    /// Attach the underlying cause
    ///
    /// ```rust
    /// use kernel::error::app_error::AppError;
    ///
    /// let io = std::io::Error::other("connection reset");
    /// let err = AppError::bad_gateway("OpenStreetMap is unavailable").with_source(io);
    /// assert_eq!(err.source_chain(), vec!["connection reset"]);
    /// ```
    #[inline]
    pub fn with_source<E>(mut self, source: E) -> Self
    where
        E: Error + Send + Sync + 'static,
    {
        self.source = Some(Box::new(source));
        self
    }

    #[inline]
    pub fn kind(&self) -> ErrorKind {
        self.kind
    }

    #[inline]
    pub fn status_code(&self) -> u16 {
        self.kind.status_code()
    }

    #[inline]
    pub fn message(&self) -> &str {
        &self.message
    }

    #[inline]
    pub fn field_errors(&self) -> &[FieldError] {
        &self.errors
    }

    #[inline]
    pub fn is_server_error(&self) -> bool {
        self.kind.is_server_error()
    }

    #[inline]
    pub fn is_client_error(&self) -> bool {
        self.kind.is_client_error()
    }

    /// Source messages, outermost first
    pub fn source_chain(&self) -> Vec<String> {
        std::iter::successors(self.source(), |&err| err.source())
            .map(ToString::to_string)
            .collect()
    }
}

impl fmt::Debug for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut builder = f.debug_struct("AppError");
        builder
            .field("kind", &self.kind)
            .field("message", &self.message);
        if !self.errors.is_empty() {
            builder.field("errors", &self.errors);
        }
        if let Some(source) = &self.source {
            builder.field("source", source);
        }
        builder.finish()
    }
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.message)
    }
}

impl Error for AppError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        self.source
            .as_deref()
            .map(|e| e as &(dyn Error + 'static))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug)]
    struct Outer(std::io::Error);

    impl fmt::Display for Outer {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.write_str("overpass request failed")
        }
    }

    impl Error for Outer {
        fn source(&self) -> Option<&(dyn Error + 'static)> {
            Some(&self.0)
        }
    }

    #[test]
    fn test_constructors_pick_kind() {
        assert_eq!(AppError::duplicate("taken").kind(), ErrorKind::Duplicate);
        assert_eq!(AppError::unauthorized("missing token").status_code(), 401);
        assert_eq!(AppError::bad_gateway("upstream").status_code(), 502);
        assert!(AppError::internal("boom").is_server_error());
        assert!(AppError::not_found("gone").is_client_error());
    }

    #[test]
    fn test_validation_carries_fields() {
        let err = AppError::validation(vec![FieldError::new("email", "Email is required")]);
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.message(), "Please check your input and try again");
        assert_eq!(err.field_errors()[0].field, "email");
    }

    #[test]
    fn test_source_chain_walks_nested_sources() {
        let inner = std::io::Error::other("connection reset");
        let err = AppError::bad_gateway("Failed to reach OpenStreetMap").with_source(Outer(inner));
        assert_eq!(
            err.source_chain(),
            vec!["overpass request failed", "connection reset"]
        );
        assert!(AppError::internal("plain").source_chain().is_empty());
    }

    #[test]
    fn test_display() {
        let err = AppError::not_found("The specified post does not exist");
        assert_eq!(err.to_string(), "[Not Found] The specified post does not exist");
    }
}
