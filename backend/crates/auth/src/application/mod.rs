//! Application Layer
//!
//! Use cases and application services.

pub mod authenticate;
pub mod config;
pub mod current_user;
pub mod refresh_token;
pub mod sign_in;
pub mod sign_out;
pub mod sign_up;
pub mod token_issuer;

// Re-exports
pub use authenticate::{AuthContext, AuthenticateUseCase};
pub use config::AuthConfig;
pub use current_user::CurrentUserUseCase;
pub use refresh_token::RefreshTokenUseCase;
pub use sign_in::{SignInInput, SignInOutput, SignInUseCase};
pub use sign_out::SignOutUseCase;
pub use sign_up::{SignUpInput, SignUpOutput, SignUpUseCase};
pub use token_issuer::{AccessClaims, TokenIssuer};
