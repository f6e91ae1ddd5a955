//! API DTOs

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::Pagination;
use kernel::validation::{invalid, phone_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::domain::entity::{
    Post, PostDetail, PostDraft, PostFilter, PostListing, ProfileChanges, RestaurantSummary,
    UserCounts, UserListing, UserProfile, UserSummary,
};

// ============================================================================
// Field rules
// ============================================================================

fn content_rule(value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(invalid("content", "Post content cannot be empty"));
    }
    if value.chars().count() > 1000 {
        return Err(invalid("content", "Post content must not exceed 1000 characters"));
    }
    Ok(())
}

fn restaurant_id_rule(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<RestaurantId>()
        .map(drop)
        .map_err(|_| invalid("restaurant_id", "Please provide a valid restaurant ID"))
}

fn full_name_rule(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < 2 {
        return Err(invalid("full_name", "Full name must be at least 2 characters long"));
    }
    if len > 100 {
        return Err(invalid("full_name", "Full name must not exceed 100 characters"));
    }
    Ok(())
}

/// Empty string clears the phone number
fn optional_phone_rule(value: &str) -> Result<(), ValidationError> {
    if value.is_empty() {
        return Ok(());
    }
    phone_number(value)
}

fn preferences_rule(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(invalid("preferences", "Preferences must be an object"))
    }
}

fn default_public() -> bool {
    true
}

// ============================================================================
// Requests
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreatePostRequest {
    #[validate(custom(function = "content_rule"))]
    pub content: String,
    #[validate(custom(function = "restaurant_id_rule"))]
    pub restaurant_id: Option<String>,
    #[validate(url(message = "Please provide a valid image URL"))]
    pub image_url: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl CreatePostRequest {
    /// Restaurant the post is about; the id was checked during validation
    pub fn restaurant_id(&self) -> Option<RestaurantId> {
        self.restaurant_id.as_deref().and_then(|id| id.parse().ok())
    }
}

impl From<CreatePostRequest> for PostDraft {
    fn from(req: CreatePostRequest) -> Self {
        Self {
            content: req.content,
            image_url: req.image_url,
            rating: req.rating,
            is_public: req.is_public,
        }
    }
}

/// Full replace of the author-editable fields
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdatePostRequest {
    #[validate(custom(function = "content_rule"))]
    pub content: String,
    #[validate(url(message = "Please provide a valid image URL"))]
    pub image_url: Option<String>,
    #[validate(range(min = 1, max = 5, message = "Rating must be between 1 and 5"))]
    pub rating: Option<i16>,
    #[serde(default = "default_public")]
    pub is_public: bool,
}

impl From<UpdatePostRequest> for PostDraft {
    fn from(req: UpdatePostRequest) -> Self {
        Self {
            content: req.content,
            image_url: req.image_url,
            rating: req.rating,
            is_public: req.is_public,
        }
    }
}

/// `?userId=&restaurantId=&rating=`; blank or unparsable values are ignored
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PostListQuery {
    pub user_id: Option<String>,
    pub restaurant_id: Option<String>,
    pub rating: Option<String>,
}

impl From<PostListQuery> for PostFilter {
    fn from(q: PostListQuery) -> Self {
        Self {
            user_id: q.user_id.and_then(|s| s.trim().parse().ok()),
            restaurant_id: q.restaurant_id.and_then(|s| s.trim().parse().ok()),
            rating: q.rating.and_then(|s| s.trim().parse().ok()),
            ..Self::default()
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateProfileRequest {
    #[validate(custom(function = "full_name_rule"))]
    pub full_name: Option<String>,
    #[validate(custom(function = "optional_phone_rule"))]
    pub phone: Option<String>,
    #[validate(length(max = 500, message = "Bio must not exceed 500 characters"))]
    pub bio: Option<String>,
    #[validate(length(max = 100, message = "Location name must not exceed 100 characters"))]
    pub location_name: Option<String>,
    #[validate(custom(function = "preferences_rule"))]
    pub preferences: Option<Value>,
}

impl From<UpdateProfileRequest> for ProfileChanges {
    fn from(req: UpdateProfileRequest) -> Self {
        Self {
            full_name: req.full_name,
            phone: req.phone,
            bio: req.bio,
            location_name: req.location_name,
            preferences: req.preferences,
        }
    }
}

// ============================================================================
// Shared views
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

// ============================================================================
// Posts
// ============================================================================

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PostView {
    pub id: PostId,
    pub user_id: UserId,
    pub restaurant_id: Option<RestaurantId>,
    pub content: String,
    pub image_url: Option<String>,
    pub rating: Option<i16>,
    pub is_public: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Post> for PostView {
    fn from(p: Post) -> Self {
        Self {
            id: p.post_id,
            user_id: p.user_id,
            restaurant_id: p.restaurant_id,
            content: p.content,
            image_url: p.image_url,
            rating: p.rating,
            is_public: p.is_public,
            is_featured: p.is_featured,
            created_at: p.created_at,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RestaurantRefView {
    pub id: RestaurantId,
    pub name: String,
    pub category: String,
    pub address: String,
}

impl From<RestaurantSummary> for RestaurantRefView {
    fn from(r: RestaurantSummary) -> Self {
        Self {
            id: r.restaurant_id,
            name: r.name,
            category: r.category,
            address: r.address,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostCountsView {
    pub likes: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListingView {
    #[serde(flatten)]
    pub post: PostView,
    pub user: UserView,
    pub restaurant: Option<RestaurantRefView>,
    #[serde(rename = "_count")]
    pub count: PostCountsView,
}

impl From<PostListing> for PostListingView {
    fn from(l: PostListing) -> Self {
        Self {
            post: l.post.into(),
            user: l.author.into(),
            restaurant: l.restaurant.map(Into::into),
            count: PostCountsView {
                likes: l.like_count,
            },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostListResponse {
    pub posts: Vec<PostListingView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostResponse {
    pub message: &'static str,
    pub post: PostListingView,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthorView {
    #[serde(flatten)]
    pub user: UserView,
    pub bio: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RestaurantDetailRefView {
    #[serde(flatten)]
    pub restaurant: RestaurantRefView,
    pub phone: String,
    pub rating_average: f64,
}

impl From<RestaurantSummary> for RestaurantDetailRefView {
    fn from(r: RestaurantSummary) -> Self {
        Self {
            phone: r.phone.clone(),
            rating_average: r.rating_average,
            restaurant: r.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeView {
    pub user: UserView,
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailView {
    #[serde(flatten)]
    pub post: PostView,
    pub user: AuthorView,
    pub restaurant: Option<RestaurantDetailRefView>,
    pub likes: Vec<LikeView>,
    #[serde(rename = "_count")]
    pub count: PostCountsView,
}

impl From<PostDetail> for PostDetailView {
    fn from(d: PostDetail) -> Self {
        let PostListing {
            post,
            author,
            restaurant,
            like_count,
        } = d.listing;
        Self {
            post: post.into(),
            user: AuthorView {
                user: author.into(),
                bio: d.author_bio,
            },
            restaurant: restaurant.map(Into::into),
            likes: d
                .recent_likes
                .into_iter()
                .map(|u| LikeView { user: u.into() })
                .collect(),
            count: PostCountsView { likes: like_count },
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct PostDetailResponse {
    pub post: PostDetailView,
}

#[derive(Debug, Clone, Serialize)]
pub struct LikeResponse {
    pub message: &'static str,
    pub liked: bool,
}

// ============================================================================
// Users
// ============================================================================

#[derive(Debug, Clone, Serialize)]
pub struct UserCountsView {
    pub posts: i64,
    pub likes: i64,
    pub followers: i64,
    pub following: i64,
}

impl From<UserCounts> for UserCountsView {
    fn from(c: UserCounts) -> Self {
        Self {
            posts: c.posts,
            likes: c.likes,
            followers: c.followers,
            following: c.following,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserListItemView {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    #[serde(rename = "_count")]
    pub count: UserCountsView,
}

impl From<UserListing> for UserListItemView {
    fn from(l: UserListing) -> Self {
        let p = l.profile;
        Self {
            id: p.user_id,
            email: p.email,
            username: p.user_name,
            full_name: p.full_name,
            avatar_url: p.avatar_url,
            is_active: p.is_active,
            email_verified: p.email_verified,
            created_at: p.created_at,
            count: l.counts.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserListResponse {
    pub users: Vec<UserListItemView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UserDetailView {
    #[serde(flatten)]
    pub user: UserListItemView,
    pub bio: Option<String>,
    pub location_name: Option<String>,
}

impl From<UserListing> for UserDetailView {
    fn from(l: UserListing) -> Self {
        Self {
            bio: l.profile.bio.clone(),
            location_name: l.profile.location_name.clone(),
            user: l.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct UserDetailResponse {
    pub user: UserDetailView,
}

/// Caller's own profile after an update
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileView {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location_name: Option<String>,
    pub preferences: Value,
    pub is_active: bool,
    pub email_verified: bool,
    pub updated_at: DateTime<Utc>,
}

impl From<UserProfile> for ProfileView {
    fn from(p: UserProfile) -> Self {
        Self {
            id: p.user_id,
            email: p.email,
            username: p.user_name,
            full_name: p.full_name,
            phone: p.phone,
            avatar_url: p.avatar_url,
            bio: p.bio,
            location_name: p.location_name,
            preferences: p.preferences,
            is_active: p.is_active,
            email_verified: p.email_verified,
            updated_at: p.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProfileResponse {
    pub message: &'static str,
    pub user: ProfileView,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowersResponse {
    pub followers: Vec<UserView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowingResponse {
    pub following: Vec<UserView>,
    pub pagination: Pagination,
}

#[derive(Debug, Clone, Serialize)]
pub struct FollowResponse {
    pub message: &'static str,
    pub following: bool,
}

#[cfg(test)]
mod tests {
    use super::*;
    use kernel::validation::field_errors;
    use serde_json::json;

    fn fields(err: validator::ValidationErrors) -> Vec<String> {
        field_errors(&err).into_iter().map(|e| e.field).collect()
    }

    #[test]
    fn test_create_post_defaults_public() {
        let req: CreatePostRequest =
            serde_json::from_value(json!({ "content": "Great arepas" })).unwrap();
        assert!(req.validate().is_ok());
        assert!(req.is_public);
        assert_eq!(req.restaurant_id(), None);
    }

    #[test]
    fn test_create_post_violations() {
        let req: CreatePostRequest = serde_json::from_value(json!({
            "content": "   ",
            "restaurantId": "not-a-uuid",
            "imageUrl": "nope",
            "rating": 6
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(
            fields(err),
            vec!["content", "imageUrl", "rating", "restaurantId"]
        );
    }

    #[test]
    fn test_content_length_limit() {
        assert!(content_rule(&"a".repeat(1000)).is_ok());
        assert!(content_rule(&"a".repeat(1001)).is_err());
    }

    #[test]
    fn test_profile_allows_clearing_phone() {
        let req: UpdateProfileRequest =
            serde_json::from_value(json!({ "phone": "", "bio": "" })).unwrap();
        assert!(req.validate().is_ok());

        let req: UpdateProfileRequest = serde_json::from_value(json!({
            "fullName": "A",
            "phone": "call me",
            "locationName": "x".repeat(101),
            "preferences": [1, 2]
        }))
        .unwrap();
        let err = req.validate().unwrap_err();
        assert_eq!(
            fields(err),
            vec!["fullName", "locationName", "phone", "preferences"]
        );
    }

    #[test]
    fn test_post_list_query_ignores_garbage() {
        let filter: PostFilter = PostListQuery {
            user_id: Some("someone".into()),
            restaurant_id: None,
            rating: Some("5".into()),
        }
        .into();
        assert_eq!(filter.user_id, None);
        assert_eq!(filter.rating, Some(5));
        assert!(!filter.featured_only);
    }
}
