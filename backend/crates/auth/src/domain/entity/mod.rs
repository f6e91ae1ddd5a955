//! Entities

pub mod auth_session;
pub mod user;

pub use auth_session::AuthSession;
pub use user::{NewUser, User};
