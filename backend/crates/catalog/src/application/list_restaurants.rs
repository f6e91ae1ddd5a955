//! List Restaurants Use Case

use std::sync::Arc;

use kernel::pagination::{Page, PageQuery};

use crate::domain::entity::{RestaurantFilter, RestaurantListing};
use crate::domain::repository::RestaurantRepository;
use crate::error::CatalogResult;

pub struct ListRestaurantsUseCase<R>
where
    R: RestaurantRepository,
{
    repo: Arc<R>,
}

impl<R> ListRestaurantsUseCase<R>
where
    R: RestaurantRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        filter: RestaurantFilter,
        page: PageQuery,
    ) -> CatalogResult<Page<RestaurantListing>> {
        let (items, total) =
            tokio::try_join!(self.repo.list(&filter, page), self.repo.count(&filter))?;

        Ok(Page::new(items, page, total))
    }
}
