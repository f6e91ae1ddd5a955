//! Repository Traits

use chrono::{DateTime, Utc};
use kernel::id::{RestaurantId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{
    NearbyRestaurant, Restaurant, RestaurantDetail, RestaurantFilter, RestaurantListing,
    SyncCandidate,
};
use crate::error::CatalogResult;

/// Restaurant store
#[trait_variant::make(RestaurantRepository: Send)]
pub trait LocalRestaurantRepository {
    /// Active restaurants matching `filter`, verified first, then by
    /// rating, newest, id
    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageQuery,
    ) -> CatalogResult<Vec<RestaurantListing>>;

    async fn count(&self, filter: &RestaurantFilter) -> CatalogResult<i64>;

    async fn find_by_id(&self, restaurant_id: RestaurantId) -> CatalogResult<Option<Restaurant>>;

    async fn find_listing(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantListing>>;

    async fn find_detail(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantDetail>>;

    async fn create(&self, restaurant: &Restaurant) -> CatalogResult<()>;

    /// Persist the editable fields and `updated_at`
    async fn update(&self, restaurant: &Restaurant) -> CatalogResult<()>;

    /// Returns false when nothing was deleted
    async fn delete(&self, restaurant_id: RestaurantId) -> CatalogResult<bool>;

    /// Every active restaurant with owner and counts, for in-memory ranking
    async fn list_active(&self) -> CatalogResult<Vec<NearbyRestaurant>>;
}

/// Store operations used only by the map import
#[trait_variant::make(SyncRepository: Send)]
pub trait LocalSyncRepository {
    async fn find_user_id_by_user_name(&self, user_name: &str) -> CatalogResult<Option<UserId>>;

    /// Exact match on both fields
    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> CatalogResult<Option<RestaurantId>>;

    /// Refresh contact data, category and position from the source
    async fn refresh_from_source(
        &self,
        restaurant_id: RestaurantId,
        candidate: &SyncCandidate,
        at: DateTime<Utc>,
    ) -> CatalogResult<()>;

    async fn delete_all(&self) -> CatalogResult<u64>;
}

/// External source of restaurant candidates
#[trait_variant::make(RestaurantSource: Send)]
pub trait LocalRestaurantSource {
    async fn fetch(&self, limit: u32) -> CatalogResult<Vec<SyncCandidate>>;
}
