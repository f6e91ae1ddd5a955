//! Owner-side restaurant management
//!
//! Creation takes the owner from the authenticated caller only.
//! Update and delete operate on a restaurant the ownership gate has
//! already resolved via [`AuthorizeOwnerUseCase`].

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{RestaurantId, UserId};

use crate::domain::entity::{Restaurant, RestaurantDraft, RestaurantListing};
use crate::domain::repository::RestaurantRepository;
use crate::error::{CatalogError, CatalogResult};

// ============================================================================
// Ownership
// ============================================================================

pub struct AuthorizeOwnerUseCase<R>
where
    R: RestaurantRepository,
{
    repo: Arc<R>,
}

impl<R> AuthorizeOwnerUseCase<R>
where
    R: RestaurantRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Not found before forbidden: a missing restaurant is reported as such
    /// even to callers who could never own it
    pub async fn execute(
        &self,
        user_id: UserId,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Restaurant> {
        let restaurant = self
            .repo
            .find_by_id(restaurant_id)
            .await?
            .ok_or(CatalogError::RestaurantNotFound)?;

        if !restaurant.is_owned_by(user_id) {
            tracing::warn!(
                user_id = %user_id,
                restaurant_id = %restaurant_id,
                "Ownership check failed"
            );
            return Err(CatalogError::NotOwner);
        }

        Ok(restaurant)
    }
}

// ============================================================================
// Create / Update / Delete
// ============================================================================

pub struct ManageRestaurantUseCase<R>
where
    R: RestaurantRepository,
{
    repo: Arc<R>,
}

impl<R> ManageRestaurantUseCase<R>
where
    R: RestaurantRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        owner_id: UserId,
        draft: RestaurantDraft,
    ) -> CatalogResult<RestaurantListing> {
        let restaurant = Restaurant::create(draft, owner_id);
        self.repo.create(&restaurant).await?;

        tracing::info!(
            restaurant_id = %restaurant.restaurant_id,
            owner_id = %owner_id,
            name = %restaurant.name,
            "Restaurant created"
        );
        self.reload(restaurant.restaurant_id).await
    }

    pub async fn update(
        &self,
        mut restaurant: Restaurant,
        draft: RestaurantDraft,
    ) -> CatalogResult<RestaurantListing> {
        restaurant.apply(draft, Utc::now());
        self.repo.update(&restaurant).await?;

        tracing::info!(
            restaurant_id = %restaurant.restaurant_id,
            name = %restaurant.name,
            "Restaurant updated"
        );
        self.reload(restaurant.restaurant_id).await
    }

    pub async fn delete(&self, restaurant_id: RestaurantId) -> CatalogResult<()> {
        if !self.repo.delete(restaurant_id).await? {
            return Err(CatalogError::RestaurantNotFound);
        }

        tracing::info!(restaurant_id = %restaurant_id, "Restaurant deleted");
        Ok(())
    }

    async fn reload(&self, restaurant_id: RestaurantId) -> CatalogResult<RestaurantListing> {
        self.repo
            .find_listing(restaurant_id)
            .await?
            .ok_or_else(|| {
                CatalogError::Internal(format!("restaurant {restaurant_id} vanished after write"))
            })
    }
}
