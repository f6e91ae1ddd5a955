//! Catalog Routers

use std::sync::Arc;

use auth::AuthGate;
use auth::domain::repository::{AdminRepository, UserRepository};
use auth::middleware::{require_admin, require_auth};
use axum::{
    Router, middleware,
    routing::{get, post, put},
};

use crate::application::CatalogConfig;
use crate::domain::repository::{RestaurantRepository, RestaurantSource, SyncRepository};
use crate::infra::overpass::OverpassClient;
use crate::infra::postgres::PgCatalogRepository;
use crate::presentation::handlers::{self, CatalogAppState, SyncAppState};
use crate::presentation::middleware::require_owner;

/// `/api/restaurants` backed by PostgreSQL
pub fn restaurant_router<A>(repo: PgCatalogRepository, gate: AuthGate<A>) -> Router
where
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    restaurant_router_generic(repo, gate)
}

pub fn restaurant_router_generic<R, A>(repo: R, gate: AuthGate<A>) -> Router
where
    R: RestaurantRepository + Clone + Send + Sync + 'static,
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let state = CatalogAppState {
        repo: Arc::new(repo),
    };

    let authenticated = Router::new()
        .route("/", post(handlers::create::<R>))
        .route_layer(middleware::from_fn_with_state(gate.clone(), require_auth::<A>));

    // Layers run bottom-up: authenticate, then check ownership
    let owned = Router::new()
        .route(
            "/{id}",
            put(handlers::update::<R>).delete(handlers::delete::<R>),
        )
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            require_owner::<R>,
        ))
        .route_layer(middleware::from_fn_with_state(gate, require_auth::<A>));

    Router::new()
        .route("/", get(handlers::list::<R>))
        .route("/nearby/location", get(handlers::nearby::<R>))
        .route("/{id}", get(handlers::detail::<R>))
        .merge(authenticated)
        .merge(owned)
        .with_state(state)
}

/// `/api/sync` backed by PostgreSQL and the Overpass API
pub fn sync_router<A>(
    repo: PgCatalogRepository,
    source: OverpassClient,
    gate: AuthGate<A>,
    config: Arc<CatalogConfig>,
) -> Router
where
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    sync_router_generic(repo, source, gate, config)
}

/// Every sync route is restricted to administrators
pub fn sync_router_generic<R, S, A>(
    repo: R,
    source: S,
    gate: AuthGate<A>,
    config: Arc<CatalogConfig>,
) -> Router
where
    R: RestaurantRepository + SyncRepository + Clone + Send + Sync + 'static,
    S: RestaurantSource + Clone + Send + Sync + 'static,
    A: UserRepository + AdminRepository + Clone + Send + Sync + 'static,
{
    let state = SyncAppState {
        repo: Arc::new(repo),
        source: Arc::new(source),
        config,
    };

    Router::new()
        .route(
            "/restaurants",
            post(handlers::sync::<R, S>).delete(handlers::purge::<R, S>),
        )
        .route("/restaurants/preview", get(handlers::preview::<R, S>))
        .route_layer(middleware::from_fn_with_state(gate, require_admin::<A>))
        .with_state(state)
}
