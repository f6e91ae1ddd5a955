//! Presentation Layer

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod router;

pub use handlers::{CatalogAppState, SyncAppState};
pub use middleware::{OwnedRestaurant, require_owner};
pub use router::{restaurant_router, restaurant_router_generic, sync_router, sync_router_generic};
