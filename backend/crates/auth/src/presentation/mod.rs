//! Presentation Layer
//!
//! HTTP handlers, DTOs, extractors, router, and middleware.

pub mod dto;
pub mod extract;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use extract::ClientIp;
pub use handlers::AuthAppState;
pub use middleware::{AuthGate, optional_auth, require_admin, require_auth};
pub use router::{auth_router, auth_router_generic};
