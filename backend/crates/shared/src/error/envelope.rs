//! HTTP error envelope
//!
//! Every failed request is answered with the same JSON shape:
//!
//! ```json
//! { "error": true, "message": "...", "statusCode": 404,
//!   "timestamp": "2024-01-01T00:00:00.000Z", "path": "/api/posts/..." }
//! ```
//!
//! plus `errors` (field list) for validation failures and `stack` (source
//! chain) outside production. [`AppError`] renders itself without knowing the
//! request path; [`error_envelope`] runs around the router, fills in `path`,
//! decides on `stack`, and converts framework rejections (bad path params,
//! 405s, ...) into the same shape.

use std::any::Any;

use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::{HeaderValue, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use chrono::{SecondsFormat, Utc};
use serde::Serialize;

use super::app_error::AppError;
use crate::validation::FieldError;

/// Upper bound when buffering a foreign error body to reuse it as message
const FOREIGN_BODY_LIMIT: usize = 16 * 1024;

/// Envelope rendering options
#[derive(Debug, Clone, Copy, Default)]
pub struct EnvelopeConfig {
    /// Include the error source chain as `stack`
    pub expose_stack: bool,
}

impl EnvelopeConfig {
    pub fn development() -> Self {
        Self { expose_stack: true }
    }

    pub fn production() -> Self {
        Self {
            expose_stack: false,
        }
    }
}

/// Error data carried from [`AppError::into_response`] to [`error_envelope`]
#[derive(Debug, Clone)]
pub struct ErrorDetails {
    status: StatusCode,
    message: String,
    errors: Vec<FieldError>,
    stack: Vec<String>,
}

impl ErrorDetails {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
            errors: Vec::new(),
            stack: Vec::new(),
        }
    }

    fn render(self, path: &str, expose_stack: bool) -> Response {
        let body = Envelope {
            error: true,
            message: &self.message,
            status_code: self.status.as_u16(),
            timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true),
            path,
            errors: (!self.errors.is_empty()).then_some(self.errors.as_slice()),
            stack: (expose_stack && !self.stack.is_empty()).then_some(self.stack.as_slice()),
        };
        let bytes = match serde_json::to_vec(&body) {
            Ok(bytes) => bytes,
            Err(_) => br#"{"error":true,"message":"Internal server error","statusCode":500}"#.to_vec(),
        };

        let mut response = Response::new(Body::from(bytes));
        *response.status_mut() = self.status;
        response.headers_mut().insert(
            header::CONTENT_TYPE,
            HeaderValue::from_static("application/json"),
        );
        response.extensions_mut().insert(self);
        response
    }
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct Envelope<'a> {
    error: bool,
    message: &'a str,
    status_code: u16,
    timestamp: String,
    path: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    errors: Option<&'a [FieldError]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    stack: Option<&'a [String]>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if self.is_server_error() {
            tracing::error!(
                kind = %self.kind(),
                message = %self.message(),
                source = ?self.source_chain(),
                "request failed"
            );
        }

        let mut details = ErrorDetails::new(status, self.message());
        details.errors = self.field_errors().to_vec();
        details.stack = self.source_chain();
        details.render("", false)
    }
}

/// Middleware completing the envelope with request path and stack
///
/// ```rust,ignore
/// let app = Router::new()
///     .fallback(route_not_found)
///     .layer(middleware::from_fn_with_state(EnvelopeConfig::development(), error_envelope));
/// ```
pub async fn error_envelope(
    State(config): State<EnvelopeConfig>,
    req: Request,
    next: Next,
) -> Response {
    let path = req.uri().path().to_owned();
    let response = next.run(req).await;

    if let Some(details) = response.extensions().get::<ErrorDetails>().cloned() {
        return details.render(&path, config.expose_stack);
    }

    let status = response.status();
    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    // Rejection produced by the framework itself (plain text body)
    let (_, body) = response.into_parts();
    let text = axum::body::to_bytes(body, FOREIGN_BODY_LIMIT)
        .await
        .map(|bytes| String::from_utf8_lossy(&bytes).trim().to_owned())
        .unwrap_or_default();
    let message = if text.is_empty() {
        status.canonical_reason().unwrap_or("Request failed").to_owned()
    } else {
        text
    };
    ErrorDetails::new(status, message).render(&path, config.expose_stack)
}

/// Fallback handler for unknown routes
pub async fn route_not_found() -> AppError {
    AppError::not_found("Route not found")
}

/// Response for a panicking handler, for `tower_http::catch_panic::CatchPanicLayer::custom`
pub fn panic_response(err: Box<dyn Any + Send + 'static>) -> Response {
    let detail = if let Some(s) = err.downcast_ref::<String>() {
        s.clone()
    } else if let Some(s) = err.downcast_ref::<&str>() {
        (*s).to_owned()
    } else {
        "unknown panic payload".to_owned()
    };
    tracing::error!(panic = %detail, "handler panicked");

    let mut details = ErrorDetails::new(StatusCode::INTERNAL_SERVER_ERROR, "Internal server error");
    details.stack = vec![detail];
    details.render("", false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::Router;
    use axum::routing::get;
    use tower::ServiceExt;

    async fn invalid() -> AppError {
        AppError::validation(vec![FieldError::new("email", "Email is required")])
    }

    async fn broken() -> AppError {
        let io = std::io::Error::other("disk on fire");
        AppError::internal("Internal server error").with_source(io)
    }

    fn app(config: EnvelopeConfig) -> Router {
        Router::new()
            .route("/invalid", get(invalid))
            .route("/broken", get(broken))
            .fallback(route_not_found)
            .layer(axum::middleware::from_fn_with_state(config, error_envelope))
    }

    async fn call(app: Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let res = app
            .oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = res.status();
        let bytes = axum::body::to_bytes(res.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap())
    }

    #[tokio::test]
    async fn test_validation_envelope() {
        let (status, body) = call(app(EnvelopeConfig::production()), "/invalid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert_eq!(body["statusCode"], 400);
        assert_eq!(body["path"], "/invalid");
        assert_eq!(body["errors"][0]["field"], "email");
        assert!(body["timestamp"].is_string());
        assert!(body.get("stack").is_none());
    }

    #[tokio::test]
    async fn test_stack_only_outside_production() {
        let (_, body) = call(app(EnvelopeConfig::development()), "/broken").await;
        assert_eq!(body["stack"][0], "disk on fire");

        let (status, body) = call(app(EnvelopeConfig::production()), "/broken").await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(body.get("stack").is_none());
        assert_eq!(body["message"], "Internal server error");
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let (status, body) = call(app(EnvelopeConfig::production()), "/nowhere").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["message"], "Route not found");
        assert_eq!(body["path"], "/nowhere");
    }

    #[tokio::test]
    async fn test_framework_rejection_is_wrapped() {
        let app = Router::new()
            .route("/items/{id}", get(|axum::extract::Path(_id): axum::extract::Path<uuid::Uuid>| async { "ok" }))
            .layer(axum::middleware::from_fn_with_state(
                EnvelopeConfig::production(),
                error_envelope,
            ));
        let (status, body) = call(app, "/items/not-a-uuid").await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["error"], true);
        assert_eq!(body["path"], "/items/not-a-uuid");
    }

    #[test]
    fn test_panic_response() {
        let res = panic_response(Box::new("boom"));
        assert_eq!(res.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
