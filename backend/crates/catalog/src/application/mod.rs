//! Application Layer

pub mod config;
pub mod get_restaurant;
pub mod list_restaurants;
pub mod manage_restaurant;
pub mod nearby;
pub mod sync;

pub use config::{BoundingBox, CatalogConfig};
pub use get_restaurant::GetRestaurantUseCase;
pub use list_restaurants::ListRestaurantsUseCase;
pub use manage_restaurant::{AuthorizeOwnerUseCase, ManageRestaurantUseCase};
pub use nearby::NearbyRestaurantsUseCase;
pub use sync::{SyncPreview, SyncRestaurantsUseCase};
