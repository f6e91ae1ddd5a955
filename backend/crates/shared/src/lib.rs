//! Shared Kernel - Domain-crossing minimal core
//!
//! This crate contains the "smallest core" of domain vocabulary:
//! - Common error types, result aliases and the HTTP error envelope
//! - Typed entity IDs shared by every bounded context
//! - Pagination parameters and metadata
//! - Glue between declarative request validation and [`error::app_error::AppError`]
//!
//! **Design Principle**: Only include things that are "hard to change"
//! and have consistent meaning across all domains.

pub mod error {
    pub mod app_error;
    pub mod conversions;
    #[cfg(feature = "axum")]
    pub mod envelope;
    pub mod kind;
}
pub mod id;
pub mod pagination;
pub mod validation;
