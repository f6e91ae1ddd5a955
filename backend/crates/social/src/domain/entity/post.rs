//! Post Entity

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};

use super::UserSummary;

/// Review or photo post, optionally tied to a restaurant
#[derive(Debug, Clone, PartialEq)]
pub struct Post {
    pub post_id: PostId,
    /// Author
    pub user_id: UserId,
    pub restaurant_id: Option<RestaurantId>,
    pub content: String,
    pub image_url: Option<String>,
    /// 1..=5 when present
    pub rating: Option<i16>,
    pub is_public: bool,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Author-editable part of a post, replaced as a whole on update
#[derive(Debug, Clone, PartialEq)]
pub struct PostDraft {
    pub content: String,
    pub image_url: Option<String>,
    pub rating: Option<i16>,
    pub is_public: bool,
}

impl Post {
    pub fn create(author: UserId, restaurant_id: Option<RestaurantId>, draft: PostDraft) -> Self {
        let now = Utc::now();
        Self {
            post_id: PostId::new(),
            user_id: author,
            restaurant_id,
            content: draft.content,
            image_url: draft.image_url,
            rating: draft.rating,
            is_public: draft.is_public,
            is_featured: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn apply(&mut self, draft: PostDraft, at: DateTime<Utc>) {
        self.content = draft.content;
        self.image_url = draft.image_url;
        self.rating = draft.rating;
        self.is_public = draft.is_public;
        self.updated_at = at;
    }

    pub fn is_authored_by(&self, user_id: UserId) -> bool {
        self.user_id == user_id
    }

    /// Private posts are visible to their author only
    pub fn is_visible_to(&self, viewer: Option<UserId>) -> bool {
        self.is_public || viewer.is_some_and(|v| self.is_authored_by(v))
    }
}

/// Restaurant fields embedded in post responses
#[derive(Debug, Clone, PartialEq)]
pub struct RestaurantSummary {
    pub restaurant_id: RestaurantId,
    pub name: String,
    pub category: String,
    pub address: String,
    pub phone: String,
    pub rating_average: f64,
}

/// Post joined with its author, restaurant and like count
#[derive(Debug, Clone, PartialEq)]
pub struct PostListing {
    pub post: Post,
    pub author: UserSummary,
    pub restaurant: Option<RestaurantSummary>,
    pub like_count: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PostDetail {
    pub listing: PostListing,
    pub author_bio: Option<String>,
    /// Newest first, at most ten
    pub recent_likes: Vec<UserSummary>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PostOrder {
    /// Featured first, then newest
    #[default]
    FeaturedFirst,
    Newest,
}

/// Public posts narrowed by optional criteria
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PostFilter {
    pub user_id: Option<UserId>,
    pub restaurant_id: Option<RestaurantId>,
    pub rating: Option<i16>,
    pub featured_only: bool,
    pub order: PostOrder,
}

impl PostFilter {
    pub fn featured() -> Self {
        Self {
            featured_only: true,
            order: PostOrder::Newest,
            ..Self::default()
        }
    }

    /// Public timeline of one user
    pub fn by_author(user_id: UserId) -> Self {
        Self {
            user_id: Some(user_id),
            order: PostOrder::Newest,
            ..Self::default()
        }
    }

    pub fn matches(&self, post: &Post) -> bool {
        post.is_public
            && self.user_id.is_none_or(|u| post.user_id == u)
            && self.restaurant_id.is_none_or(|r| post.restaurant_id == Some(r))
            && self.rating.is_none_or(|r| post.rating == Some(r))
            && (!self.featured_only || post.is_featured)
    }
}
