//! Catalog entities

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};

use crate::domain::geo::{Coordinates, Located};

/// Restaurant aggregate
///
/// `category` is free text: API-created rows use the fixed category list,
/// imported rows use the categories derived from map data.
#[derive(Debug, Clone, PartialEq)]
pub struct Restaurant {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub category: String,
    pub price_range: i16,
    pub rating_average: f64,
    pub is_active: bool,
    pub is_verified: bool,
    pub owner_id: UserId,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Editable subset of a restaurant, replaced as a whole on update
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDraft {
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: String,
    pub email: Option<String>,
    pub website: Option<String>,
    pub category: String,
    pub price_range: i16,
}

impl Restaurant {
    pub fn create(draft: RestaurantDraft, owner_id: UserId) -> Self {
        let now = Utc::now();
        Self {
            restaurant_id: RestaurantId::new(),
            name: draft.name,
            address: draft.address,
            latitude: draft.latitude,
            longitude: draft.longitude,
            phone: draft.phone,
            email: draft.email,
            website: draft.website,
            category: draft.category,
            price_range: draft.price_range,
            rating_average: 0.0,
            is_active: true,
            is_verified: false,
            owner_id,
            created_at: now,
            updated_at: now,
        }
    }

    /// Imported rows start unverified with no rating
    pub fn import(candidate: &SyncCandidate, owner_id: UserId) -> Self {
        Self::create(
            RestaurantDraft {
                name: candidate.name.clone(),
                address: candidate.address.clone(),
                latitude: candidate.latitude,
                longitude: candidate.longitude,
                phone: candidate.phone.clone().unwrap_or_default(),
                email: None,
                website: candidate.website.clone(),
                category: candidate.category.clone(),
                price_range: candidate.price_range,
            },
            owner_id,
        )
    }

    pub fn apply(&mut self, draft: RestaurantDraft, at: DateTime<Utc>) {
        self.name = draft.name;
        self.address = draft.address;
        self.latitude = draft.latitude;
        self.longitude = draft.longitude;
        self.phone = draft.phone;
        self.email = draft.email;
        self.website = draft.website;
        self.category = draft.category;
        self.price_range = draft.price_range;
        self.updated_at = at;
    }

    pub fn is_owned_by(&self, user_id: UserId) -> bool {
        self.owner_id == user_id
    }
}

impl Located for Restaurant {
    fn coordinates(&self) -> Coordinates {
        Coordinates::new(self.latitude, self.longitude)
    }

    fn rating(&self) -> f64 {
        self.rating_average
    }
}

/// Public face of a user embedded in catalog responses
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

/// Restaurant joined with its owner
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantListing {
    pub restaurant: Restaurant,
    pub owner: UserSummary,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RestaurantCounts {
    pub posts: i64,
    pub favorites: i64,
}

/// Candidate row for the proximity search
#[derive(Debug, Clone, PartialEq)]
pub struct NearbyRestaurant {
    pub listing: RestaurantListing,
    pub counts: RestaurantCounts,
}

impl Located for NearbyRestaurant {
    fn coordinates(&self) -> Coordinates {
        self.listing.restaurant.coordinates()
    }

    fn rating(&self) -> f64 {
        self.listing.restaurant.rating_average
    }
}

/// Public post shown on the restaurant page
#[derive(Debug, Clone, PartialEq)]
pub struct PostPreview {
    pub post_id: PostId,
    pub author: UserSummary,
    pub content: String,
    pub image_url: Option<String>,
    pub rating: Option<i16>,
    pub like_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Restaurant page: owner, latest public posts, some fans, totals
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantDetail {
    pub listing: RestaurantListing,
    pub posts: Vec<PostPreview>,
    pub favorited_by: Vec<UserSummary>,
    pub counts: RestaurantCounts,
}

/// Listing filters; unset fields do not constrain
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RestaurantFilter {
    pub category: Option<String>,
    pub price_range: Option<i16>,
    /// Case-insensitive substring of name, address or category
    pub search: Option<String>,
}

impl RestaurantFilter {
    pub fn matches(&self, restaurant: &Restaurant) -> bool {
        if !restaurant.is_active {
            return false;
        }
        if self.category.as_ref().is_some_and(|c| *c != restaurant.category) {
            return false;
        }
        if self.price_range.is_some_and(|p| p != restaurant.price_range) {
            return false;
        }
        match &self.search {
            Some(term) => {
                let term = term.to_lowercase();
                [&restaurant.name, &restaurant.address, &restaurant.category]
                    .iter()
                    .any(|field| field.to_lowercase().contains(&term))
            }
            None => true,
        }
    }
}

/// Restaurant as read from the external map source
#[derive(Debug, Clone, PartialEq)]
pub struct SyncCandidate {
    /// `osm_<element id>`
    pub source_id: String,
    pub name: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub category: String,
    pub price_range: i16,
    /// Search hints derived from amenity tags
    pub tags: Vec<String>,
}

/// Outcome of one import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SyncReport {
    pub total_found: usize,
    pub created: usize,
    pub updated: usize,
}

impl SyncReport {
    pub fn processed(&self) -> usize {
        self.created + self.updated
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft() -> RestaurantDraft {
        RestaurantDraft {
            name: "La Puerta Falsa".into(),
            address: "Calle 11 #6-50, Bogotá".into(),
            latitude: 4.5981,
            longitude: -74.0758,
            phone: "+57 1 286 5091".into(),
            email: None,
            website: None,
            category: "other".into(),
            price_range: 1,
        }
    }

    #[test]
    fn test_create_defaults() {
        let owner = UserId::new();
        let r = Restaurant::create(draft(), owner);
        assert!(r.is_active);
        assert!(!r.is_verified);
        assert_eq!(r.rating_average, 0.0);
        assert!(r.is_owned_by(owner));
        assert!(!r.is_owned_by(UserId::new()));
    }

    #[test]
    fn test_apply_replaces_editable_fields_only() {
        let owner = UserId::new();
        let mut r = Restaurant::create(draft(), owner);
        let id = r.restaurant_id;
        let created = r.created_at;

        let mut changed = draft();
        changed.name = "Puerta Falsa".into();
        changed.price_range = 2;
        let at = created + chrono::Duration::minutes(5);
        r.apply(changed, at);

        assert_eq!(r.name, "Puerta Falsa");
        assert_eq!(r.price_range, 2);
        assert_eq!(r.restaurant_id, id);
        assert_eq!(r.owner_id, owner);
        assert_eq!(r.created_at, created);
        assert_eq!(r.updated_at, at);
    }

    #[test]
    fn test_filter_search_is_case_insensitive() {
        let r = Restaurant::create(draft(), UserId::new());
        let filter = RestaurantFilter {
            search: Some("puerta".into()),
            ..Default::default()
        };
        assert!(filter.matches(&r));

        let filter = RestaurantFilter {
            search: Some("BOGOTÁ".into()),
            ..Default::default()
        };
        assert!(filter.matches(&r));

        let filter = RestaurantFilter {
            price_range: Some(3),
            ..Default::default()
        };
        assert!(!filter.matches(&r));
    }

    #[test]
    fn test_filter_skips_inactive() {
        let mut r = Restaurant::create(draft(), UserId::new());
        r.is_active = false;
        assert!(!RestaurantFilter::default().matches(&r));
    }
}
