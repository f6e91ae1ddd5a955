//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::Pagination;
use kernel::validation::{invalid, phone_number};
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidationError};

use crate::domain::entity::{
    NearbyRestaurant, PostPreview, Restaurant, RestaurantCounts, RestaurantDetail,
    RestaurantDraft, RestaurantFilter, RestaurantListing, SyncCandidate, SyncReport, UserSummary,
};
use crate::domain::geo::Nearby;
use crate::domain::value_object::RestaurantCategory;

// ============================================================================
// Field rules
// ============================================================================

fn name_rule(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < 2 {
        return Err(invalid("name", "Restaurant name must be at least 2 characters long"));
    }
    if len > 100 {
        return Err(invalid("name", "Restaurant name must not exceed 100 characters"));
    }
    Ok(())
}

fn address_rule(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < 5 {
        return Err(invalid("address", "Address must be at least 5 characters long"));
    }
    if len > 500 {
        return Err(invalid("address", "Address must not exceed 500 characters"));
    }
    Ok(())
}

fn category_rule(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<RestaurantCategory>()
        .map(drop)
        .map_err(|_| invalid("category", "Please select a valid restaurant category"))
}

// ============================================================================
// Requests
// ============================================================================

/// Create and full-replace update share one shape
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantRequest {
    #[validate(custom(function = "name_rule"))]
    pub name: String,
    #[validate(custom(function = "address_rule"))]
    pub address: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Latitude must be between -90 and 90"))]
    pub latitude: f64,
    #[validate(range(
        min = -180.0,
        max = 180.0,
        message = "Longitude must be between -180 and 180"
    ))]
    pub longitude: f64,
    #[validate(custom(function = "phone_number"))]
    pub phone: String,
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: Option<String>,
    #[validate(url(message = "Please provide a valid website URL"))]
    pub website: Option<String>,
    #[validate(custom(function = "category_rule"))]
    pub category: String,
    #[validate(range(min = 1, max = 4, message = "Price range must be between 1 and 4"))]
    pub price_range: i16,
}

impl From<RestaurantRequest> for RestaurantDraft {
    fn from(req: RestaurantRequest) -> Self {
        Self {
            name: req.name.trim().to_owned(),
            address: req.address.trim().to_owned(),
            latitude: req.latitude,
            longitude: req.longitude,
            phone: req.phone,
            email: req.email,
            website: req.website,
            category: req.category,
            price_range: req.price_range,
        }
    }
}

/// `?category=&priceRange=&search=`; blank or unparsable values are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantListQuery {
    pub category: Option<String>,
    pub price_range: Option<String>,
    pub search: Option<String>,
}

impl From<RestaurantListQuery> for RestaurantFilter {
    fn from(q: RestaurantListQuery) -> Self {
        let non_blank = |v: Option<String>| v.filter(|s| !s.trim().is_empty());
        Self {
            category: non_blank(q.category),
            price_range: q.price_range.and_then(|p| p.trim().parse().ok()),
            search: non_blank(q.search),
        }
    }
}

/// `?lat=&lng=&radius=` kept as text so absence and garbage are told apart
#[derive(Debug, Clone, Default, Deserialize)]
pub struct NearbyQuery {
    pub lat: Option<String>,
    pub lng: Option<String>,
    pub radius: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PreviewQuery {
    pub limit: Option<String>,
}

// ============================================================================
// Responses
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserView {
    pub id: UserId,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}

impl From<UserSummary> for UserView {
    fn from(u: UserSummary) -> Self {
        Self {
            id: u.user_id,
            username: u.user_name,
            full_name: u.full_name,
            avatar_url: u.avatar_url,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantView {
    pub id: RestaurantId,
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

impl From<Restaurant> for RestaurantView {
    fn from(r: Restaurant) -> Self {
        Self {
            id: r.restaurant_id,
            name: r.name,
            address: r.address,
            latitude: r.latitude,
            longitude: r.longitude,
            phone: r.phone,
            email: r.email,
            website: r.website,
            category: r.category,
            price_range: r.price_range,
            rating_average: r.rating_average,
            is_active: r.is_active,
            is_verified: r.is_verified,
            owner_id: r.owner_id,
            created_at: r.created_at,
            updated_at: r.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ListingView {
    #[serde(flatten)]
    pub restaurant: RestaurantView,
    pub owner: UserView,
}

impl From<RestaurantListing> for ListingView {
    fn from(l: RestaurantListing) -> Self {
        Self {
            restaurant: l.restaurant.into(),
            owner: l.owner.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CountsView {
    pub posts: i64,
    pub user_favorites: i64,
}

impl From<RestaurantCounts> for CountsView {
    fn from(c: RestaurantCounts) -> Self {
        Self {
            posts: c.posts,
            user_favorites: c.favorites,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantListResponse {
    pub restaurants: Vec<ListingView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantResponse {
    pub message: &'static str,
    pub restaurant: ListingView,
}

// ----------------------------------------------------------------------------
// Detail
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
pub struct LikeCountView {
    pub likes: i64,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostPreviewView {
    pub id: PostId,
    pub content: String,
    pub image_url: Option<String>,
    pub rating: Option<i16>,
    pub created_at: DateTime<Utc>,
    pub user: UserView,
    #[serde(rename = "_count")]
    pub count: LikeCountView,
}

impl From<PostPreview> for PostPreviewView {
    fn from(p: PostPreview) -> Self {
        Self {
            id: p.post_id,
            content: p.content,
            image_url: p.image_url,
            rating: p.rating,
            created_at: p.created_at,
            user: p.author.into(),
            count: LikeCountView { likes: p.like_count },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FavoriteView {
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DetailView {
    #[serde(flatten)]
    pub listing: ListingView,
    pub posts: Vec<PostPreviewView>,
    pub user_favorites: Vec<FavoriteView>,
    #[serde(rename = "_count")]
    pub count: CountsView,
}

impl From<RestaurantDetail> for DetailView {
    fn from(d: RestaurantDetail) -> Self {
        Self {
            listing: d.listing.into(),
            posts: d.posts.into_iter().map(Into::into).collect(),
            user_favorites: d
                .favorited_by
                .into_iter()
                .map(|u| FavoriteView { user: u.into() })
                .collect(),
            count: d.counts.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantDetailResponse {
    pub restaurant: DetailView,
}

// ----------------------------------------------------------------------------
// Nearby
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct NearbyView {
    #[serde(flatten)]
    pub listing: ListingView,
    #[serde(rename = "_count")]
    pub count: CountsView,
    pub distance_km: f64,
}

impl From<Nearby<NearbyRestaurant>> for NearbyView {
    fn from(n: Nearby<NearbyRestaurant>) -> Self {
        Self {
            listing: n.item.listing.into(),
            count: n.item.counts.into(),
            distance_km: n.distance_km,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CenterView {
    pub latitude: f64,
    pub longitude: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct NearbyResponse {
    pub restaurants: Vec<NearbyView>,
    pub center: CenterView,
    pub radius: f64,
}

// ----------------------------------------------------------------------------
// Sync
// ----------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SyncReportView {
    pub total_found: usize,
    pub created: usize,
    pub updated: usize,
    pub processed: usize,
}

impl From<SyncReport> for SyncReportView {
    fn from(r: SyncReport) -> Self {
        Self {
            total_found: r.total_found,
            created: r.created,
            updated: r.updated,
            processed: r.processed(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SyncResponse {
    pub message: &'static str,
    pub data: SyncReportView,
}

/// Candidate as it would be stored
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CandidateView {
    pub id: String,
    pub name: String,
    pub category: String,
    pub address: String,
    pub latitude: f64,
    pub longitude: f64,
    pub phone: Option<String>,
    pub website: Option<String>,
    pub price_range: i16,
    pub rating_average: f64,
    pub is_active: bool,
    pub is_verified: bool,
    pub tags: Vec<String>,
}

impl From<SyncCandidate> for CandidateView {
    fn from(c: SyncCandidate) -> Self {
        Self {
            id: c.source_id,
            name: c.name,
            category: c.category,
            address: c.address,
            latitude: c.latitude,
            longitude: c.longitude,
            phone: c.phone,
            website: c.website,
            price_range: c.price_range,
            rating_average: 0.0,
            is_active: true,
            is_verified: false,
            tags: c.tags,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewData {
    pub count: usize,
    pub restaurants: Vec<CandidateView>,
}

#[derive(Debug, Clone, Serialize)]
pub struct PreviewResponse {
    pub message: &'static str,
    pub data: PreviewData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PurgeData {
    pub deleted_count: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PurgeResponse {
    pub message: &'static str,
    pub data: PurgeData,
}
