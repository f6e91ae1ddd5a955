//! Nearby Restaurants Use Case

use std::sync::Arc;

use crate::domain::entity::NearbyRestaurant;
use crate::domain::geo::{self, Coordinates, Nearby};
use crate::domain::repository::RestaurantRepository;
use crate::error::CatalogResult;

pub struct NearbyRestaurantsUseCase<R>
where
    R: RestaurantRepository,
{
    repo: Arc<R>,
}

impl<R> NearbyRestaurantsUseCase<R>
where
    R: RestaurantRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Active restaurants within `radius_km`, nearest first
    pub async fn execute(
        &self,
        center: Coordinates,
        radius_km: f64,
    ) -> CatalogResult<Vec<Nearby<NearbyRestaurant>>> {
        let candidates = self.repo.list_active().await?;
        let mut nearby = geo::filter_by_radius(candidates, center, radius_km);
        geo::sort_by_distance(&mut nearby);

        tracing::debug!(
            latitude = center.latitude,
            longitude = center.longitude,
            radius_km,
            found = nearby.len(),
            "Nearby search"
        );
        Ok(nearby)
    }
}
