//! Catalog (Restaurants) Backend Module
//!
//! Clean Architecture structure:
//! - `domain/` - Restaurant entities, proximity ranking, repository traits
//! - `application/` - Use cases and configuration
//! - `infra/` - PostgreSQL repository, Overpass API client
//! - `presentation/` - HTTP handlers, DTOs, ownership gate, routers
//!
//! ## Features
//! - Paginated, filterable restaurant listing and detail pages
//! - Owner-only update and delete behind an ownership gate
//! - Nearby search ranked by distance, near-ties by rating
//! - Admin-only import of restaurants from OpenStreetMap

pub mod application;
pub mod domain;
pub mod error;
pub mod infra;
pub mod presentation;


pub use application::{BoundingBox, CatalogConfig};
pub use error::{CatalogError, CatalogResult};
pub use infra::overpass::OverpassClient;
pub use infra::postgres::PgCatalogRepository;
pub use presentation::router::{
    restaurant_router, restaurant_router_generic, sync_router, sync_router_generic,
};

#[cfg(any(test, feature = "testing"))]
pub use infra::memory::{MemoryCatalogRepository, StaticRestaurantSource};
