//! Post use cases
//!
//! Reads honour visibility; writes check authorship against the caller
//! taken from the authorization gate.

use std::sync::Arc;

use chrono::Utc;
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::{Page, PageQuery};

use crate::domain::entity::{Post, PostDetail, PostDraft, PostFilter, PostListing};
use crate::domain::repository::PostRepository;
use crate::error::{SocialError, SocialResult};

// ============================================================================
// Reads
// ============================================================================

pub struct ListPostsUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> ListPostsUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        filter: PostFilter,
        page: PageQuery,
    ) -> SocialResult<Page<PostListing>> {
        let (items, total) = tokio::try_join!(
            self.repo.list_posts(&filter, page),
            self.repo.count_posts(&filter)
        )?;

        Ok(Page::new(items, page, total))
    }
}

pub struct GetPostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> GetPostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, post_id: PostId, viewer: Option<UserId>) -> SocialResult<PostDetail> {
        let detail = self
            .repo
            .find_post_detail(post_id)
            .await?
            .ok_or(SocialError::PostNotFound)?;

        if !detail.listing.post.is_visible_to(viewer) {
            return Err(SocialError::PostNotPublic);
        }

        Ok(detail)
    }
}

// ============================================================================
// Writes
// ============================================================================

pub struct ManagePostUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> ManagePostUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn create(
        &self,
        author: UserId,
        restaurant_id: Option<RestaurantId>,
        draft: PostDraft,
    ) -> SocialResult<PostListing> {
        let post = Post::create(author, restaurant_id, draft);
        self.repo.create_post(&post).await?;

        tracing::info!(post_id = %post.post_id, user_id = %author, "Post created");
        self.reload(post.post_id).await
    }

    pub async fn update(
        &self,
        caller: UserId,
        post_id: PostId,
        draft: PostDraft,
    ) -> SocialResult<PostListing> {
        let mut post = self.authored(caller, post_id, SocialError::NotAuthorEdit).await?;
        post.apply(draft, Utc::now());
        self.repo.update_post(&post).await?;

        tracing::info!(post_id = %post_id, user_id = %caller, "Post updated");
        self.reload(post_id).await
    }

    pub async fn delete(&self, caller: UserId, post_id: PostId) -> SocialResult<()> {
        self.authored(caller, post_id, SocialError::NotAuthorDelete)
            .await?;

        if !self.repo.delete_post(post_id).await? {
            return Err(SocialError::PostNotFound);
        }

        tracing::info!(post_id = %post_id, user_id = %caller, "Post deleted");
        Ok(())
    }

    /// Not found before forbidden
    async fn authored(
        &self,
        caller: UserId,
        post_id: PostId,
        denied: SocialError,
    ) -> SocialResult<Post> {
        let post = self
            .repo
            .find_post(post_id)
            .await?
            .ok_or(SocialError::PostNotFound)?;

        if !post.is_authored_by(caller) {
            return Err(denied);
        }
        Ok(post)
    }

    async fn reload(&self, post_id: PostId) -> SocialResult<PostListing> {
        self.repo
            .find_post_listing(post_id)
            .await?
            .ok_or_else(|| SocialError::Internal(format!("post {post_id} vanished after write")))
    }
}

// ============================================================================
// Likes
// ============================================================================

pub struct ToggleLikeUseCase<R>
where
    R: PostRepository,
{
    repo: Arc<R>,
}

impl<R> ToggleLikeUseCase<R>
where
    R: PostRepository,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    /// Returns whether the caller likes the post afterwards
    pub async fn execute(&self, user_id: UserId, post_id: PostId) -> SocialResult<bool> {
        if self.repo.find_post(post_id).await?.is_none() {
            return Err(SocialError::PostNotFound);
        }

        if self.repo.remove_like(post_id, user_id).await? {
            tracing::debug!(post_id = %post_id, user_id = %user_id, "Post unliked");
            return Ok(false);
        }

        self.repo.add_like(post_id, user_id).await?;
        tracing::debug!(post_id = %post_id, user_id = %user_id, "Post liked");
        Ok(true)
    }
}
