//! Auth (Authentication) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Entities, value objects, repository traits
//! - `application/` - Use cases, token issuer, configuration
//! - `infra/` - Database implementations
//! - `presentation/` - HTTP handlers, DTOs, gate middleware, router
//!
//! ## Features
//! - Registration and email + password login
//! - Signed bearer tokens (default 7 days) for request authentication
//! - Session ledger of per-device session tokens (24 hours), revoked by logout
//! - Authorization gate reused by the other bounded contexts
//!
//! ## Security Model
//! - Passwords hashed with Argon2id; cost parameters live in the stored hash
//! - Unknown email and wrong password are indistinguishable to clients
//! - Disabled accounts are refused at login and by the gate

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


// Re-exports for convenience
pub use application::{AuthConfig, AuthContext, TokenIssuer};
pub use error::{AuthError, AuthResult};
pub use infra::postgres::PgAuthRepository;
pub use presentation::middleware::AuthGate;
pub use presentation::router::{auth_router, auth_router_generic};

#[cfg(any(test, feature = "testing"))]
pub use infra::memory::MemoryAuthRepository;

// Re-export kernel error types for unified error handling
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

pub mod middleware {
    pub use crate::presentation::middleware::*;
}

/// Fixtures shared with downstream crates' router tests
#[cfg(any(test, feature = "testing"))]
pub mod testing {
    use std::sync::Arc;

    use kernel::id::UserId;
    use platform::password::PasswordHasher;

    use crate::application::{AuthConfig, TokenIssuer};
    use crate::domain::entity::{NewUser, User};
    use crate::domain::repository::UserRepository;
    use crate::domain::value_object::{Email, RawPassword, UserName, UserPassword};
    use crate::infra::memory::MemoryAuthRepository;

    pub const TEST_PASSWORD: &str = "secret123";

    pub fn token_issuer() -> Arc<TokenIssuer> {
        Arc::new(TokenIssuer::new(&AuthConfig::new(vec![42u8; 32])).expect("32-byte key"))
    }

    /// Build an active user with `TEST_PASSWORD`
    pub fn user(user_name: &str) -> User {
        let raw = RawPassword::new(TEST_PASSWORD.to_string()).expect("valid password");
        let hasher = PasswordHasher::new(1).expect("valid cost");
        User::register(NewUser {
            email: Email::new(format!("{user_name}@example.com")).expect("valid email"),
            user_name: UserName::new(user_name).expect("valid user name"),
            password: UserPassword::from_raw(&raw, &hasher).expect("hashable"),
            full_name: format!("{user_name} tester"),
            phone: None,
        })
    }

    /// Insert a user and return its id plus a bearer token
    pub async fn seed_user(
        repo: &MemoryAuthRepository,
        tokens: &TokenIssuer,
        user_name: &str,
    ) -> (UserId, String) {
        let user = user(user_name);
        repo.create(&user).await.expect("unique user");
        let token = tokens
            .issue_access_token(user.user_id, user.email.as_str())
            .expect("signable")
            .token;
        (user.user_id, token)
    }
}
