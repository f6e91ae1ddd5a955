//! In-memory repositories for router tests

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::{RestaurantId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{
    NearbyRestaurant, PostPreview, Restaurant, RestaurantCounts, RestaurantDetail,
    RestaurantFilter, RestaurantListing, SyncCandidate, UserSummary,
};
use crate::domain::repository::{RestaurantRepository, RestaurantSource, SyncRepository};
use crate::error::CatalogResult;

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserSummary>,
    restaurants: Vec<Restaurant>,
    /// (restaurant, post, public)
    posts: Vec<(RestaurantId, PostPreview, bool)>,
    favorites: Vec<(RestaurantId, UserId)>,
}

impl State {
    fn listing(&self, restaurant: &Restaurant) -> CatalogResult<RestaurantListing> {
        // Mirrors the owner foreign key
        let owner = self
            .users
            .get(&restaurant.owner_id)
            .cloned()
            .ok_or_else(|| AppError::bad_request("Foreign key constraint violation"))?;
        Ok(RestaurantListing {
            restaurant: restaurant.clone(),
            owner,
        })
    }

    fn counts(&self, restaurant_id: RestaurantId) -> RestaurantCounts {
        RestaurantCounts {
            posts: self.posts.iter().filter(|(r, _, _)| *r == restaurant_id).count() as i64,
            favorites: self
                .favorites
                .iter()
                .filter(|(r, _)| *r == restaurant_id)
                .count() as i64,
        }
    }
}

fn listing_order(a: &Restaurant, b: &Restaurant) -> Ordering {
    b.is_verified
        .cmp(&a.is_verified)
        .then_with(|| b.rating_average.total_cmp(&a.rating_average))
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.restaurant_id.as_uuid().cmp(b.restaurant_id.as_uuid()))
}

#[derive(Clone, Default)]
pub struct MemoryCatalogRepository {
    state: Arc<Mutex<State>>,
}

impl MemoryCatalogRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Make a user known as a restaurant owner, post author or fan
    pub fn add_user(&self, user: UserSummary) {
        self.lock().users.insert(user.user_id, user);
    }

    pub fn add_post(&self, restaurant_id: RestaurantId, post: PostPreview, is_public: bool) {
        self.lock().posts.push((restaurant_id, post, is_public));
    }

    pub fn add_favorite(&self, restaurant_id: RestaurantId, user_id: UserId) {
        self.lock().favorites.push((restaurant_id, user_id));
    }

    pub fn restaurants(&self) -> Vec<Restaurant> {
        self.lock().restaurants.clone()
    }
}

impl RestaurantRepository for MemoryCatalogRepository {
    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageQuery,
    ) -> CatalogResult<Vec<RestaurantListing>> {
        let state = self.lock();
        let mut matching: Vec<&Restaurant> = state
            .restaurants
            .iter()
            .filter(|r| filter.matches(r))
            .collect();
        matching.sort_by(|a, b| listing_order(a, b));

        matching
            .into_iter()
            .skip(page.offset() as usize)
            .take(page.limit as usize)
            .map(|r| state.listing(r))
            .collect()
    }

    async fn count(&self, filter: &RestaurantFilter) -> CatalogResult<i64> {
        let state = self.lock();
        Ok(state.restaurants.iter().filter(|r| filter.matches(r)).count() as i64)
    }

    async fn find_by_id(&self, restaurant_id: RestaurantId) -> CatalogResult<Option<Restaurant>> {
        Ok(self
            .lock()
            .restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
            .cloned())
    }

    async fn find_listing(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantListing>> {
        let state = self.lock();
        state
            .restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
            .map(|r| state.listing(r))
            .transpose()
    }

    async fn find_detail(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantDetail>> {
        let state = self.lock();
        let Some(restaurant) = state
            .restaurants
            .iter()
            .find(|r| r.restaurant_id == restaurant_id)
        else {
            return Ok(None);
        };

        let mut posts: Vec<PostPreview> = state
            .posts
            .iter()
            .filter(|(r, _, public)| *r == restaurant_id && *public)
            .map(|(_, p, _)| p.clone())
            .collect();
        posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        posts.truncate(10);

        let favorited_by = state
            .favorites
            .iter()
            .rev()
            .filter(|(r, _)| *r == restaurant_id)
            .filter_map(|(_, u)| state.users.get(u).cloned())
            .take(5)
            .collect();

        Ok(Some(RestaurantDetail {
            listing: state.listing(restaurant)?,
            posts,
            favorited_by,
            counts: state.counts(restaurant_id),
        }))
    }

    async fn create(&self, restaurant: &Restaurant) -> CatalogResult<()> {
        let mut state = self.lock();
        if !state.users.contains_key(&restaurant.owner_id) {
            return Err(AppError::bad_request("Foreign key constraint violation").into());
        }
        state.restaurants.push(restaurant.clone());
        Ok(())
    }

    async fn update(&self, restaurant: &Restaurant) -> CatalogResult<()> {
        let mut state = self.lock();
        if let Some(slot) = state
            .restaurants
            .iter_mut()
            .find(|r| r.restaurant_id == restaurant.restaurant_id)
        {
            *slot = restaurant.clone();
        }
        Ok(())
    }

    async fn delete(&self, restaurant_id: RestaurantId) -> CatalogResult<bool> {
        let mut state = self.lock();
        let before = state.restaurants.len();
        state.restaurants.retain(|r| r.restaurant_id != restaurant_id);
        state.favorites.retain(|(r, _)| *r != restaurant_id);
        Ok(state.restaurants.len() < before)
    }

    async fn list_active(&self) -> CatalogResult<Vec<NearbyRestaurant>> {
        let state = self.lock();
        state
            .restaurants
            .iter()
            .filter(|r| r.is_active)
            .map(|r| -> CatalogResult<NearbyRestaurant> {
                Ok(NearbyRestaurant {
                    listing: state.listing(r)?,
                    counts: state.counts(r.restaurant_id),
                })
            })
            .collect()
    }
}

impl SyncRepository for MemoryCatalogRepository {
    async fn find_user_id_by_user_name(&self, user_name: &str) -> CatalogResult<Option<UserId>> {
        Ok(self
            .lock()
            .users
            .values()
            .find(|u| u.user_name == user_name)
            .map(|u| u.user_id))
    }

    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> CatalogResult<Option<RestaurantId>> {
        Ok(self
            .lock()
            .restaurants
            .iter()
            .find(|r| r.name == name && r.address == address)
            .map(|r| r.restaurant_id))
    }

    async fn refresh_from_source(
        &self,
        restaurant_id: RestaurantId,
        candidate: &SyncCandidate,
        at: DateTime<Utc>,
    ) -> CatalogResult<()> {
        let mut state = self.lock();
        if let Some(r) = state
            .restaurants
            .iter_mut()
            .find(|r| r.restaurant_id == restaurant_id)
        {
            if let Some(phone) = &candidate.phone {
                r.phone = phone.clone();
            }
            if candidate.website.is_some() {
                r.website = candidate.website.clone();
            }
            r.category = candidate.category.clone();
            r.latitude = candidate.latitude;
            r.longitude = candidate.longitude;
            r.updated_at = at;
        }
        Ok(())
    }

    async fn delete_all(&self) -> CatalogResult<u64> {
        let mut state = self.lock();
        let deleted = state.restaurants.len() as u64;
        state.restaurants.clear();
        state.favorites.clear();
        Ok(deleted)
    }
}

/// Canned map source: fixed candidates, or an upstream failure
#[derive(Clone, Default)]
pub struct StaticRestaurantSource {
    candidates: Option<Arc<Vec<SyncCandidate>>>,
}

impl StaticRestaurantSource {
    pub fn new(candidates: Vec<SyncCandidate>) -> Self {
        Self {
            candidates: Some(Arc::new(candidates)),
        }
    }

    /// Every fetch fails as an unreachable upstream would
    pub fn unavailable() -> Self {
        Self::default()
    }
}

impl RestaurantSource for StaticRestaurantSource {
    async fn fetch(&self, limit: u32) -> CatalogResult<Vec<SyncCandidate>> {
        match &self.candidates {
            Some(list) => Ok(list.iter().take(limit as usize).cloned().collect()),
            None => Err(
                AppError::bad_gateway("Failed to fetch restaurants from OpenStreetMap").into(),
            ),
        }
    }
}
