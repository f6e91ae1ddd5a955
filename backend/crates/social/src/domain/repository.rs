//! Repository Traits
//!
//! Method names are prefixed per aggregate so one store can implement
//! both traits without ambiguous calls.

use kernel::id::{PostId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{
    Post, PostDetail, PostFilter, PostListing, UserListing, UserProfile, UserSummary,
};
use crate::error::SocialResult;

/// Posts and likes
#[trait_variant::make(PostRepository: Send)]
pub trait LocalPostRepository {
    /// Public posts matching `filter`, ordered per `filter.order`
    async fn list_posts(&self, filter: &PostFilter, page: PageQuery)
    -> SocialResult<Vec<PostListing>>;

    async fn count_posts(&self, filter: &PostFilter) -> SocialResult<i64>;

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>>;

    async fn find_post_listing(&self, post_id: PostId) -> SocialResult<Option<PostListing>>;

    async fn find_post_detail(&self, post_id: PostId) -> SocialResult<Option<PostDetail>>;

    async fn create_post(&self, post: &Post) -> SocialResult<()>;

    /// Persist the editable fields and `updated_at`
    async fn update_post(&self, post: &Post) -> SocialResult<()>;

    /// Returns false when nothing was deleted
    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool>;

    /// No-op when the like already exists
    async fn add_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<()>;

    /// Returns false when there was no like to remove
    async fn remove_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<bool>;
}

/// User directory and the follow graph
#[trait_variant::make(UserDirectory: Send)]
pub trait LocalUserDirectory {
    /// Newest accounts first
    async fn list_users(&self, page: PageQuery) -> SocialResult<Vec<UserListing>>;

    async fn count_users(&self) -> SocialResult<i64>;

    async fn find_user_listing(&self, user_id: UserId) -> SocialResult<Option<UserListing>>;

    async fn find_profile(&self, user_id: UserId) -> SocialResult<Option<UserProfile>>;

    /// Persist the profile fields and `updated_at`
    async fn update_profile(&self, profile: &UserProfile) -> SocialResult<()>;

    async fn user_exists(&self, user_id: UserId) -> SocialResult<bool>;

    /// Users following `user_id`, most recent follow first
    async fn list_followers(&self, user_id: UserId, page: PageQuery)
    -> SocialResult<Vec<UserSummary>>;

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64>;

    /// Users `user_id` follows, most recent follow first
    async fn list_following(&self, user_id: UserId, page: PageQuery)
    -> SocialResult<Vec<UserSummary>>;

    async fn count_following(&self, user_id: UserId) -> SocialResult<i64>;

    /// No-op when the edge already exists
    async fn add_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<()>;

    /// Returns false when there was no edge to remove
    async fn remove_follow(&self, follower_id: UserId, following_id: UserId)
    -> SocialResult<bool>;
}
