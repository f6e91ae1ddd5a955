//! In-memory repository for router tests

use std::cmp::Ordering;
use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use chrono::{DateTime, Utc};
use kernel::error::app_error::AppError;
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::PageQuery;

use crate::domain::entity::{
    Post, PostDetail, PostFilter, PostListing, PostOrder, RestaurantSummary, UserCounts,
    UserListing, UserProfile, UserSummary,
};
use crate::domain::repository::{PostRepository, UserDirectory};
use crate::error::SocialResult;

#[derive(Default)]
struct State {
    users: HashMap<UserId, UserProfile>,
    restaurants: HashMap<RestaurantId, RestaurantSummary>,
    posts: Vec<Post>,
    likes: Vec<(PostId, UserId, DateTime<Utc>)>,
    /// (follower, following, at)
    follows: Vec<(UserId, UserId, DateTime<Utc>)>,
}

fn foreign_key_violation() -> AppError {
    AppError::bad_request("Foreign key constraint violation")
}

fn paged<T>(items: Vec<T>, page: PageQuery) -> Vec<T> {
    items
        .into_iter()
        .skip(page.offset() as usize)
        .take(page.limit as usize)
        .collect()
}

fn post_order(order: PostOrder, a: &Post, b: &Post) -> Ordering {
    let featured = match order {
        PostOrder::FeaturedFirst => b.is_featured.cmp(&a.is_featured),
        PostOrder::Newest => Ordering::Equal,
    };
    featured
        .then_with(|| b.created_at.cmp(&a.created_at))
        .then_with(|| a.post_id.as_uuid().cmp(b.post_id.as_uuid()))
}

impl State {
    fn summary(&self, user_id: UserId) -> SocialResult<UserSummary> {
        Ok(self
            .users
            .get(&user_id)
            .ok_or_else(foreign_key_violation)?
            .summary())
    }

    fn listing(&self, post: &Post) -> SocialResult<PostListing> {
        Ok(PostListing {
            post: post.clone(),
            author: self.summary(post.user_id)?,
            restaurant: post
                .restaurant_id
                .and_then(|id| self.restaurants.get(&id).cloned()),
            like_count: self.likes.iter().filter(|(p, _, _)| *p == post.post_id).count() as i64,
        })
    }

    fn user_listing(&self, profile: &UserProfile) -> UserListing {
        let id = profile.user_id;
        UserListing {
            profile: profile.clone(),
            counts: UserCounts {
                posts: self.posts.iter().filter(|p| p.user_id == id).count() as i64,
                likes: self.likes.iter().filter(|(_, u, _)| *u == id).count() as i64,
                followers: self.follows.iter().filter(|(_, to, _)| *to == id).count() as i64,
                following: self.follows.iter().filter(|(from, _, _)| *from == id).count() as i64,
            },
        }
    }

    /// Follow edges selected by `pick`, most recent first, mapped to the other side
    fn follow_side(
        &self,
        pick: impl Fn(&(UserId, UserId, DateTime<Utc>)) -> Option<UserId>,
    ) -> SocialResult<Vec<UserSummary>> {
        let mut edges: Vec<(UserId, DateTime<Utc>)> = self
            .follows
            .iter()
            .filter_map(|edge| pick(edge).map(|other| (other, edge.2)))
            .collect();
        edges.sort_by(|a, b| {
            b.1.cmp(&a.1)
                .then_with(|| a.0.as_uuid().cmp(b.0.as_uuid()))
        });
        edges.into_iter().map(|(id, _)| self.summary(id)).collect()
    }
}

#[derive(Clone, Default)]
pub struct MemorySocialRepository {
    state: Arc<Mutex<State>>,
}

impl MemorySocialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    pub fn add_user(&self, profile: UserProfile) {
        self.lock().users.insert(profile.user_id, profile);
    }

    pub fn add_restaurant(&self, restaurant: RestaurantSummary) {
        self.lock()
            .restaurants
            .insert(restaurant.restaurant_id, restaurant);
    }

    pub fn profile(&self, user_id: UserId) -> Option<UserProfile> {
        self.lock().users.get(&user_id).cloned()
    }

    pub fn posts(&self) -> Vec<Post> {
        self.lock().posts.clone()
    }

    pub fn like_count(&self, post_id: PostId) -> usize {
        self.lock()
            .likes
            .iter()
            .filter(|(p, _, _)| *p == post_id)
            .count()
    }
}

impl PostRepository for MemorySocialRepository {
    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageQuery,
    ) -> SocialResult<Vec<PostListing>> {
        let state = self.lock();
        let mut matching: Vec<&Post> = state.posts.iter().filter(|p| filter.matches(p)).collect();
        matching.sort_by(|a, b| post_order(filter.order, a, b));

        paged(matching, page)
            .into_iter()
            .map(|p| state.listing(p))
            .collect()
    }

    async fn count_posts(&self, filter: &PostFilter) -> SocialResult<i64> {
        Ok(self
            .lock()
            .posts
            .iter()
            .filter(|p| filter.matches(p))
            .count() as i64)
    }

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>> {
        Ok(self
            .lock()
            .posts
            .iter()
            .find(|p| p.post_id == post_id)
            .cloned())
    }

    async fn find_post_listing(&self, post_id: PostId) -> SocialResult<Option<PostListing>> {
        let state = self.lock();
        state
            .posts
            .iter()
            .find(|p| p.post_id == post_id)
            .map(|p| state.listing(p))
            .transpose()
    }

    async fn find_post_detail(&self, post_id: PostId) -> SocialResult<Option<PostDetail>> {
        let state = self.lock();
        let Some(post) = state.posts.iter().find(|p| p.post_id == post_id) else {
            return Ok(None);
        };

        let mut likes: Vec<&(PostId, UserId, DateTime<Utc>)> =
            state.likes.iter().filter(|(p, _, _)| *p == post_id).collect();
        likes.sort_by(|a, b| b.2.cmp(&a.2));
        let recent_likes = likes
            .into_iter()
            .take(10)
            .map(|(_, u, _)| state.summary(*u))
            .collect::<SocialResult<Vec<_>>>()?;

        Ok(Some(PostDetail {
            listing: state.listing(post)?,
            author_bio: state.users.get(&post.user_id).and_then(|u| u.bio.clone()),
            recent_likes,
        }))
    }

    async fn create_post(&self, post: &Post) -> SocialResult<()> {
        let mut state = self.lock();
        // Mirrors the author and restaurant foreign keys
        let restaurant_known = post
            .restaurant_id
            .is_none_or(|id| state.restaurants.contains_key(&id));
        if !state.users.contains_key(&post.user_id) || !restaurant_known {
            return Err(foreign_key_violation().into());
        }
        state.posts.push(post.clone());
        Ok(())
    }

    async fn update_post(&self, post: &Post) -> SocialResult<()> {
        let mut state = self.lock();
        if let Some(slot) = state.posts.iter_mut().find(|p| p.post_id == post.post_id) {
            *slot = post.clone();
        }
        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool> {
        let mut state = self.lock();
        let before = state.posts.len();
        state.posts.retain(|p| p.post_id != post_id);
        state.likes.retain(|(p, _, _)| *p != post_id);
        Ok(state.posts.len() < before)
    }

    async fn add_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<()> {
        let mut state = self.lock();
        if !state.users.contains_key(&user_id) || !state.posts.iter().any(|p| p.post_id == post_id)
        {
            return Err(foreign_key_violation().into());
        }
        if !state
            .likes
            .iter()
            .any(|(p, u, _)| *p == post_id && *u == user_id)
        {
            state.likes.push((post_id, user_id, Utc::now()));
        }
        Ok(())
    }

    async fn remove_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<bool> {
        let mut state = self.lock();
        let before = state.likes.len();
        state
            .likes
            .retain(|(p, u, _)| !(*p == post_id && *u == user_id));
        Ok(state.likes.len() < before)
    }
}

impl UserDirectory for MemorySocialRepository {
    async fn list_users(&self, page: PageQuery) -> SocialResult<Vec<UserListing>> {
        let state = self.lock();
        let mut users: Vec<&UserProfile> = state.users.values().collect();
        users.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| a.user_id.as_uuid().cmp(b.user_id.as_uuid()))
        });

        Ok(paged(users, page)
            .into_iter()
            .map(|u| state.user_listing(u))
            .collect())
    }

    async fn count_users(&self) -> SocialResult<i64> {
        Ok(self.lock().users.len() as i64)
    }

    async fn find_user_listing(&self, user_id: UserId) -> SocialResult<Option<UserListing>> {
        let state = self.lock();
        Ok(state.users.get(&user_id).map(|u| state.user_listing(u)))
    }

    async fn find_profile(&self, user_id: UserId) -> SocialResult<Option<UserProfile>> {
        Ok(self.profile(user_id))
    }

    async fn update_profile(&self, profile: &UserProfile) -> SocialResult<()> {
        let mut state = self.lock();
        if let Some(slot) = state.users.get_mut(&profile.user_id) {
            *slot = profile.clone();
        }
        Ok(())
    }

    async fn user_exists(&self, user_id: UserId) -> SocialResult<bool> {
        Ok(self.lock().users.contains_key(&user_id))
    }

    async fn list_followers(
        &self,
        user_id: UserId,
        page: PageQuery,
    ) -> SocialResult<Vec<UserSummary>> {
        let followers = self
            .lock()
            .follow_side(|(from, to, _)| (*to == user_id).then_some(*from))?;
        Ok(paged(followers, page))
    }

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|(_, to, _)| *to == user_id)
            .count() as i64)
    }

    async fn list_following(
        &self,
        user_id: UserId,
        page: PageQuery,
    ) -> SocialResult<Vec<UserSummary>> {
        let following = self
            .lock()
            .follow_side(|(from, to, _)| (*from == user_id).then_some(*to))?;
        Ok(paged(following, page))
    }

    async fn count_following(&self, user_id: UserId) -> SocialResult<i64> {
        Ok(self
            .lock()
            .follows
            .iter()
            .filter(|(from, _, _)| *from == user_id)
            .count() as i64)
    }

    async fn add_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<()> {
        let mut state = self.lock();
        if !state.users.contains_key(&follower_id) || !state.users.contains_key(&following_id) {
            return Err(foreign_key_violation().into());
        }
        if !state
            .follows
            .iter()
            .any(|(from, to, _)| *from == follower_id && *to == following_id)
        {
            state.follows.push((follower_id, following_id, Utc::now()));
        }
        Ok(())
    }

    async fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let mut state = self.lock();
        let before = state.follows.len();
        state
            .follows
            .retain(|(from, to, _)| !(*from == follower_id && *to == following_id));
        Ok(state.follows.len() < before)
    }
}
