//! Social entities

mod post;
mod profile;

use kernel::id::UserId;

pub use post::{
    Post, PostDetail, PostDraft, PostFilter, PostListing, PostOrder, RestaurantSummary,
};
pub use profile::{ProfileChanges, UserCounts, UserListing, UserProfile};

/// Public face of a user embedded in post and follow responses
#[derive(Debug, Clone, PartialEq)]
pub struct UserSummary {
    pub user_id: UserId,
    pub user_name: String,
    pub full_name: String,
    pub avatar_url: Option<String>,
}
