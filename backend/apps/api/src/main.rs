//! API Server Entry Point
//!
//! Application entry point and server initialization.
//! Uses `anyhow` for startup errors, but application-level
//! errors should use `kernel::error::AppError`.

mod config;

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use auth::{AuthGate, PgAuthRepository, TokenIssuer, auth_router};
use axum::{
    Json, Router, http,
    http::{Method, header},
    middleware,
    routing::get,
};
use catalog::{OverpassClient, PgCatalogRepository, restaurant_router, sync_router};
use kernel::error::envelope::{error_envelope, panic_response, route_not_found};
use serde_json::{Value, json};
use social::{PgSocialRepository, post_router, user_router};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tokio::signal;
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{AllowHeaders, AllowMethods, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::ServerConfig;

// Re-export unified error types for use in handlers
pub use kernel::error::{
    app_error::{AppError, AppResult},
    kind::ErrorKind,
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "api=info,auth=info,catalog=info,social=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = ServerConfig::from_env()?;

    // Database connection
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await
        .context("failed to connect to the database")?;

    tracing::info!("Connected to database");

    // Run migrations
    sqlx::migrate!("../../../database/migrations")
        .run(&pool)
        .await?;

    tracing::info!("Migrations completed");

    // Deactivate expired session handles; failure must not block startup
    let auth_store_for_cleanup = PgAuthRepository::new(pool.clone());
    if let Err(e) = auth_store_for_cleanup.cleanup_expired().await {
        tracing::warn!(
            error = %e,
            "Auth session cleanup failed, continuing anyway"
        );
    }

    let app = build_app(pool.clone(), &config)?;

    // Start server
    let addr = config.addr();
    tracing::info!(production = config.production, "Listening on {}", addr);

    let listener = TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    pool.close().await;
    tracing::info!("Server stopped");

    Ok(())
}

/// Assemble every bounded context under `/api`
fn build_app(pool: PgPool, config: &ServerConfig) -> anyhow::Result<Router> {
    let tokens = Arc::new(TokenIssuer::new(&config.auth).context("invalid JWT_SECRET")?);
    let auth_repo = PgAuthRepository::new(pool.clone());
    let gate = AuthGate::new(Arc::new(auth_repo.clone()), tokens.clone());

    let catalog_repo = PgCatalogRepository::new(pool.clone());
    let social_repo = PgSocialRepository::new(pool);
    let overpass = OverpassClient::new(&config.catalog).context("failed to build Overpass client")?;

    let allowed_origins: Vec<http::HeaderValue> = config
        .frontend_origins
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    let cors = CorsLayer::new()
        .allow_origin(allowed_origins)
        .allow_methods(AllowMethods::list([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ]))
        .allow_headers(AllowHeaders::list([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            header::ACCEPT,
        ]))
        .allow_credentials(true);

    Ok(Router::new()
        .route("/health", get(health))
        .nest(
            "/api/auth",
            auth_router(auth_repo, tokens, config.auth.clone()),
        )
        .nest(
            "/api/restaurants",
            restaurant_router(catalog_repo.clone(), gate.clone()),
        )
        .nest(
            "/api/sync",
            sync_router(
                catalog_repo,
                overpass,
                gate.clone(),
                Arc::new(config.catalog.clone()),
            ),
        )
        .nest("/api/posts", post_router(social_repo.clone(), gate.clone()))
        .nest("/api/users", user_router(social_repo, gate))
        .fallback(route_not_found)
        .layer(CatchPanicLayer::custom(panic_response))
        .layer(middleware::from_fn_with_state(
            config.envelope(),
            error_envelope,
        ))
        .layer(TraceLayer::new_for_http())
        .layer(cors))
}

async fn health() -> Json<Value> {
    Json(json!({ "status": "ok" }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    tracing::info!("Shutdown signal received, draining connections");
}
