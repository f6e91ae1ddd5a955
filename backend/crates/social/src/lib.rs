//! Social Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Post and profile entities, repository traits
//! - `application/` - Use cases
//! - `infra/` - PostgreSQL repository
//! - `presentation/` - HTTP handlers, DTOs, routers
//!
//! ## Features
//! - Public post feed with featured posts and per-user timelines
//! - Author-only post edits, private posts readable by their author
//! - Like and follow toggles
//! - User directory and profile updates

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;

#[cfg(test)]
mod tests;

pub use error::{SocialError, SocialResult};
pub use infra::postgres::PgSocialRepository;
pub use presentation::router::{post_router, post_router_generic, user_router, user_router_generic};

#[cfg(any(test, feature = "testing"))]
pub use infra::memory::MemorySocialRepository;
