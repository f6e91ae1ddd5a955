//! Auth Router

use std::sync::Arc;

use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::application::{AuthConfig, TokenIssuer};
use crate::domain::repository::{AdminRepository, AuthSessionRepository, UserRepository};
use crate::infra::postgres::PgAuthRepository;
use crate::presentation::handlers::{self, AuthAppState};
use crate::presentation::middleware::{AuthGate, require_auth};

/// Create the Auth router with PostgreSQL repository
pub fn auth_router(repo: PgAuthRepository, tokens: Arc<TokenIssuer>, config: AuthConfig) -> Router {
    auth_router_generic(repo, tokens, config)
}

/// Create a generic Auth router for any repository implementation
pub fn auth_router_generic<R>(repo: R, tokens: Arc<TokenIssuer>, config: AuthConfig) -> Router
where
    R: UserRepository + AdminRepository + AuthSessionRepository + Clone + Send + Sync + 'static,
{
    let repo = Arc::new(repo);
    let gate = AuthGate::new(repo.clone(), tokens.clone());
    let state = AuthAppState {
        repo,
        tokens,
        config: Arc::new(config),
    };

    let protected = Router::new()
        .route("/logout", post(handlers::logout::<R>))
        .route("/me", get(handlers::me::<R>))
        .route("/refresh", post(handlers::refresh::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_auth::<R>));

    Router::new()
        .route("/register", post(handlers::register::<R>))
        .route("/login", post(handlers::login::<R>))
        .merge(protected)
        .with_state(state)
}
