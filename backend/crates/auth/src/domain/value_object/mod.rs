//! Value Objects

pub mod client_platform;
pub mod email;
pub mod user_name;
pub mod user_password;

pub use client_platform::ClientPlatform;
pub use email::{Email, EmailError};
pub use user_name::{UserName, UserNameError};
pub use user_password::{RawPassword, UserPassword};
