//! Get Restaurant Use Case

use std::sync::Arc;

use kernel::id::RestaurantId;

use crate::domain::entity::RestaurantDetail;
use crate::domain::repository::RestaurantRepository;
use crate::error::{CatalogError, CatalogResult};

pub struct GetRestaurantUseCase<R>
where
    R: RestaurantRepository,
{
    repo: Arc<R>,
}

impl<R> GetRestaurantUseCase<R>
where
    R: RestaurantRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, restaurant_id: RestaurantId) -> CatalogResult<RestaurantDetail> {
        self.repo
            .find_detail(restaurant_id)
            .await?
            .ok_or(CatalogError::RestaurantNotFound)
    }
}
