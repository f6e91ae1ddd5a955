//! Social Routers

use std::sync::Arc;

use auth::AuthGate;
use auth::domain::repository::{AdminRepository, UserRepository};
use auth::middleware::{optional_auth, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::domain::repository::{PostRepository, UserDirectory};
use crate::infra::postgres::PgSocialRepository;
use crate::presentation::handlers::{self, PostAppState, UserAppState};

/// `/api/posts` backed by PostgreSQL
pub fn post_router<A>(repo: PgSocialRepository, gate: AuthGate<A>) -> Router
where
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    post_router_generic(repo, gate)
}

pub fn post_router_generic<R, A>(repo: R, gate: AuthGate<A>) -> Router
where
    R: PostRepository + Clone + Send + Sync + 'static,
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let state = PostAppState {
        repo: Arc::new(repo),
    };

    // Authors may read their own private posts
    let readable = Router::new()
        .route("/{id}", get(handlers::get_post::<R>))
        .route_layer(middleware::from_fn_with_state(
            gate.clone(),
            optional_auth::<A>,
        ));

    let authenticated = Router::new()
        .route("/", post(handlers::create_post::<R>))
        .route(
            "/{id}",
            put(handlers::update_post::<R>).delete(handlers::delete_post::<R>),
        )
        .route("/{id}/like", post(handlers::toggle_like::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_auth::<A>));

    Router::new()
        .route("/", get(handlers::list_posts::<R>))
        .route("/featured/list", get(handlers::featured_posts::<R>))
        .merge(readable)
        .merge(authenticated)
        .with_state(state)
}

/// `/api/users` backed by PostgreSQL
pub fn user_router<A>(repo: PgSocialRepository, gate: AuthGate<A>) -> Router
where
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    user_router_generic(repo, gate)
}

pub fn user_router_generic<R, A>(repo: R, gate: AuthGate<A>) -> Router
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let state = UserAppState {
        repo: Arc::new(repo),
    };

    let authenticated = Router::new()
        .route("/", get(handlers::list_users::<R>))
        .route("/profile", put(handlers::update_profile::<R>))
        .route("/{id}/follow", post(handlers::toggle_follow::<R>))
        .route_layer(middleware::from_fn_with_state(gate, require_auth::<A>));

    Router::new()
        .route("/{id}", get(handlers::get_user::<R>))
        .route("/{id}/posts", get(handlers::user_posts::<R>))
        .route("/{id}/followers", get(handlers::followers::<R>))
        .route("/{id}/following", get(handlers::following::<R>))
        .merge(authenticated)
        .with_state(state)
}
