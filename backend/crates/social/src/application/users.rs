//! User directory, profile and follow use cases

use std::sync::Arc;

use chrono::Utc;
use kernel::id::UserId;
use kernel::pagination::{Page, PageQuery};

use crate::domain::entity::{ProfileChanges, UserListing, UserProfile, UserSummary};
use crate::domain::repository::UserDirectory;
use crate::error::{SocialError, SocialResult};

pub struct ListUsersUseCase<R>
where
    R: UserDirectory,
{
    repo: Arc<R>,
}

impl<R> ListUsersUseCase<R>
where
    R: UserDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, page: PageQuery) -> SocialResult<Page<UserListing>> {
        let (items, total) =
            tokio::try_join!(self.repo.list_users(page), self.repo.count_users())?;

        Ok(Page::new(items, page, total))
    }
}

pub struct GetUserUseCase<R>
where
    R: UserDirectory,
{
    repo: Arc<R>,
}

impl<R> GetUserUseCase<R>
where
    R: UserDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(&self, user_id: UserId) -> SocialResult<UserListing> {
        self.repo
            .find_user_listing(user_id)
            .await?
            .ok_or(SocialError::UserNotFound)
    }
}

pub struct UpdateProfileUseCase<R>
where
    R: UserDirectory,
{
    repo: Arc<R>,
}

impl<R> UpdateProfileUseCase<R>
where
    R: UserDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn execute(
        &self,
        user_id: UserId,
        changes: ProfileChanges,
    ) -> SocialResult<UserProfile> {
        let mut profile = self
            .repo
            .find_profile(user_id)
            .await?
            .ok_or(SocialError::UserNotFound)?;

        profile.apply(changes, Utc::now());
        self.repo.update_profile(&profile).await?;

        tracing::info!(user_id = %user_id, "User profile updated");
        Ok(profile)
    }
}

/// Which side of the follow graph to list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FollowSide {
    Followers,
    Following,
}

pub struct FollowUseCase<R>
where
    R: UserDirectory,
{
    repo: Arc<R>,
}

impl<R> FollowUseCase<R>
where
    R: UserDirectory,
{
    pub fn new(repo: Arc<R>) -> Self {
        Self { repo }
    }

    pub async fn list(
        &self,
        user_id: UserId,
        side: FollowSide,
        page: PageQuery,
    ) -> SocialResult<Page<UserSummary>> {
        let (items, total) = match side {
            FollowSide::Followers => tokio::try_join!(
                self.repo.list_followers(user_id, page),
                self.repo.count_followers(user_id)
            )?,
            FollowSide::Following => tokio::try_join!(
                self.repo.list_following(user_id, page),
                self.repo.count_following(user_id)
            )?,
        };

        Ok(Page::new(items, page, total))
    }

    /// Returns whether the caller follows `target` afterwards
    pub async fn toggle(&self, follower_id: UserId, target: UserId) -> SocialResult<bool> {
        if follower_id == target {
            return Err(SocialError::SelfFollow);
        }
        if !self.repo.user_exists(target).await? {
            return Err(SocialError::UserNotFound);
        }

        if self.repo.remove_follow(follower_id, target).await? {
            tracing::info!(follower_id = %follower_id, following_id = %target, "User unfollowed");
            return Ok(false);
        }

        self.repo.add_follow(follower_id, target).await?;
        tracing::info!(follower_id = %follower_id, following_id = %target, "User followed");
        Ok(true)
    }
}
