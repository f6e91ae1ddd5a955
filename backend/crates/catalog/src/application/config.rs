//! Catalog configuration

use std::time::Duration;

pub const DEFAULT_OVERPASS_URL: &str = "https://overpass-api.de/api/interpreter";
pub const DEFAULT_OVERPASS_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_SYNC_OWNER: &str = "admin";
pub const DEFAULT_SYNC_LIMIT: u32 = 50;
pub const DEFAULT_PREVIEW_LIMIT: u32 = 20;
/// Preview responses list at most this many candidates
pub const PREVIEW_SHOWN: usize = 10;
pub const DEFAULT_NEARBY_RADIUS_KM: f64 = 10.0;

/// Import area, in decimal degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BoundingBox {
    pub south: f64,
    pub west: f64,
    pub north: f64,
    pub east: f64,
}

impl BoundingBox {
    pub const BOGOTA: BoundingBox = BoundingBox {
        south: 4.45,
        west: -74.25,
        north: 4.80,
        east: -74.00,
    };
}

#[derive(Debug, Clone)]
pub struct CatalogConfig {
    pub overpass_url: String,
    pub overpass_timeout: Duration,
    pub bounds: BoundingBox,
    /// Name used in messages about the import area
    pub area_name: String,
    /// City written into addresses that carry none
    pub default_city: String,
    /// Username of the account that owns imported restaurants
    pub sync_owner: String,
    pub sync_limit: u32,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            overpass_url: DEFAULT_OVERPASS_URL.to_string(),
            overpass_timeout: DEFAULT_OVERPASS_TIMEOUT,
            bounds: BoundingBox::BOGOTA,
            area_name: "Bogotá".to_string(),
            default_city: "Bogotá".to_string(),
            sync_owner: DEFAULT_SYNC_OWNER.to_string(),
            sync_limit: DEFAULT_SYNC_LIMIT,
        }
    }
}

impl CatalogConfig {
    pub fn with_overpass_url(mut self, url: impl Into<String>) -> Self {
        self.overpass_url = url.into();
        self
    }

    pub fn with_sync_owner(mut self, user_name: impl Into<String>) -> Self {
        self.sync_owner = user_name.into();
        self
    }

    pub fn with_sync_limit(mut self, limit: u32) -> Self {
        self.sync_limit = limit;
        self
    }
}
