//! Server configuration from environment variables

use std::net::SocketAddr;

use anyhow::{Context, bail};
use auth::AuthConfig;
use catalog::CatalogConfig;
use kernel::error::envelope::EnvelopeConfig;
use platform::token::{MIN_SECRET_LEN, parse_ttl};

pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_CONNECTIONS: u32 = 5;
pub const DEFAULT_FRONTEND_ORIGINS: &str = "http://localhost:5173,http://127.0.0.1:5173";

#[derive(Debug, Clone)]
pub struct ServerConfig {
    pub database_url: String,
    pub max_connections: u32,
    pub port: u16,
    /// `APP_ENV=production`
    pub production: bool,
    pub frontend_origins: Vec<String>,
    pub auth: AuthConfig,
    pub catalog: CatalogConfig,
}

impl ServerConfig {
    pub fn from_env() -> anyhow::Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build the config from any key lookup
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> anyhow::Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let database_url = var("DATABASE_URL").context("DATABASE_URL must be set")?;

        let secret = var("JWT_SECRET").context("JWT_SECRET must be set")?;
        if secret.len() < MIN_SECRET_LEN {
            bail!("JWT_SECRET must be at least {MIN_SECRET_LEN} bytes");
        }

        let mut auth = AuthConfig::new(secret.into_bytes());
        if let Some(raw) = var("JWT_EXPIRES_IN") {
            let ttl = parse_ttl(&raw)
                .with_context(|| format!("JWT_EXPIRES_IN has an unsupported format: {raw}"))?;
            auth = auth.with_access_token_ttl(ttl);
        }
        if let Some(raw) = var("PASSWORD_HASH_COST") {
            let cost = raw
                .parse::<u32>()
                .with_context(|| format!("PASSWORD_HASH_COST is not a number: {raw}"))?;
            auth = auth.with_password_hash_cost(cost);
        }

        let mut catalog = CatalogConfig::default();
        if let Some(url) = var("OVERPASS_URL") {
            catalog = catalog.with_overpass_url(url);
        }
        if let Some(owner) = var("SYNC_OWNER_USERNAME") {
            catalog = catalog.with_sync_owner(owner);
        }
        if let Some(raw) = var("SYNC_LIMIT") {
            let limit = raw
                .parse::<u32>()
                .with_context(|| format!("SYNC_LIMIT is not a number: {raw}"))?;
            catalog = catalog.with_sync_limit(limit);
        }

        let port = match var("PORT") {
            Some(raw) => raw.parse::<u16>().with_context(|| format!("PORT is not a port: {raw}"))?,
            None => DEFAULT_PORT,
        };
        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(raw) => raw
                .parse::<u32>()
                .with_context(|| format!("DB_MAX_CONNECTIONS is not a number: {raw}"))?,
            None => DEFAULT_MAX_CONNECTIONS,
        };

        let frontend_origins = var("FRONTEND_ORIGINS")
            .unwrap_or_else(|| DEFAULT_FRONTEND_ORIGINS.to_string())
            .split(',')
            .map(|origin| origin.trim().to_string())
            .filter(|origin| !origin.is_empty())
            .collect();

        Ok(Self {
            database_url,
            max_connections,
            port,
            production: var("APP_ENV").is_some_and(|env| env == "production"),
            frontend_origins,
            auth,
            catalog,
        })
    }

    pub fn addr(&self) -> SocketAddr {
        SocketAddr::from(([0, 0, 0, 0], self.port))
    }

    pub fn envelope(&self) -> EnvelopeConfig {
        if self.production {
            EnvelopeConfig::production()
        } else {
            EnvelopeConfig::development()
        }
    }
}
