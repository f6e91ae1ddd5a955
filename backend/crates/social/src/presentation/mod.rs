//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod router;

pub use handlers::{PostAppState, UserAppState};
pub use router::{post_router, post_router_generic, user_router, user_router_generic};
