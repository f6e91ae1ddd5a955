//! HTTP Handlers

use std::sync::Arc;

use auth::AuthContext;
use axum::Json;
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use kernel::id::{PostId, UserId};
use kernel::pagination::PageQuery;
use kernel::validation::{ValidatedJson, validate};

use crate::application::{
    FollowSide, FollowUseCase, GetPostUseCase, GetUserUseCase, ListPostsUseCase,
    ListUsersUseCase, ManagePostUseCase, ToggleLikeUseCase, UpdateProfileUseCase,
};
use crate::domain::entity::PostFilter;
use crate::domain::repository::{PostRepository, UserDirectory};
use crate::error::SocialResult;
use crate::presentation::dto::{
    CreatePostRequest, FollowResponse, FollowersResponse, FollowingResponse, LikeResponse,
    MessageResponse, PostDetailResponse, PostListQuery, PostListResponse, PostResponse,
    ProfileResponse, UpdatePostRequest, UpdateProfileRequest, UserDetailResponse,
    UserListResponse,
};

#[derive(Clone)]
pub struct PostAppState<R>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

#[derive(Clone)]
pub struct UserAppState<R>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    pub repo: Arc<R>,
}

// ============================================================================
// Posts
// ============================================================================

async fn list_filtered<R>(
    repo: &Arc<R>,
    filter: PostFilter,
    page: PageQuery,
) -> SocialResult<PostListResponse>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    validate(&page)?;

    let page = ListPostsUseCase::new(repo.clone())
        .execute(filter, page)
        .await?;

    Ok(PostListResponse {
        posts: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    })
}

/// GET /api/posts
pub async fn list_posts<R>(
    State(state): State<PostAppState<R>>,
    Query(page): Query<PageQuery>,
    Query(query): Query<PostListQuery>,
) -> SocialResult<Json<PostListResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    Ok(Json(list_filtered(&state.repo, query.into(), page).await?))
}

/// GET /api/posts/featured/list
pub async fn featured_posts<R>(
    State(state): State<PostAppState<R>>,
    Query(page): Query<PageQuery>,
) -> SocialResult<Json<PostListResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    Ok(Json(
        list_filtered(&state.repo, PostFilter::featured(), page).await?,
    ))
}

/// GET /api/posts/{id}
pub async fn get_post<R>(
    State(state): State<PostAppState<R>>,
    Path(post_id): Path<PostId>,
    viewer: Option<AuthContext>,
) -> SocialResult<Json<PostDetailResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let detail = GetPostUseCase::new(state.repo.clone())
        .execute(post_id, viewer.map(|v| v.user_id))
        .await?;

    Ok(Json(PostDetailResponse {
        post: detail.into(),
    }))
}

/// POST /api/posts
pub async fn create_post<R>(
    State(state): State<PostAppState<R>>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<CreatePostRequest>,
) -> SocialResult<(StatusCode, Json<PostResponse>)>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let restaurant_id = req.restaurant_id();
    let listing = ManagePostUseCase::new(state.repo.clone())
        .create(auth.user_id, restaurant_id, req.into())
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(PostResponse {
            message: "Post created successfully",
            post: listing.into(),
        }),
    ))
}

/// PUT /api/posts/{id}
pub async fn update_post<R>(
    State(state): State<PostAppState<R>>,
    Path(post_id): Path<PostId>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<UpdatePostRequest>,
) -> SocialResult<Json<PostResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let listing = ManagePostUseCase::new(state.repo.clone())
        .update(auth.user_id, post_id, req.into())
        .await?;

    Ok(Json(PostResponse {
        message: "Post updated successfully",
        post: listing.into(),
    }))
}

/// DELETE /api/posts/{id}
pub async fn delete_post<R>(
    State(state): State<PostAppState<R>>,
    Path(post_id): Path<PostId>,
    auth: AuthContext,
) -> SocialResult<Json<MessageResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    ManagePostUseCase::new(state.repo.clone())
        .delete(auth.user_id, post_id)
        .await?;

    Ok(Json(MessageResponse {
        message: "Post deleted successfully",
    }))
}

/// POST /api/posts/{id}/like
pub async fn toggle_like<R>(
    State(state): State<PostAppState<R>>,
    Path(post_id): Path<PostId>,
    auth: AuthContext,
) -> SocialResult<Json<LikeResponse>>
where
    R: PostRepository + Clone + Send + Sync + 'static,
{
    let liked = ToggleLikeUseCase::new(state.repo.clone())
        .execute(auth.user_id, post_id)
        .await?;

    Ok(Json(LikeResponse {
        message: if liked {
            "Post liked successfully"
        } else {
            "Post unliked successfully"
        },
        liked,
    }))
}

// ============================================================================
// Users
// ============================================================================

/// GET /api/users
pub async fn list_users<R>(
    State(state): State<UserAppState<R>>,
    Query(page): Query<PageQuery>,
) -> SocialResult<Json<UserListResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    validate(&page)?;

    let page = ListUsersUseCase::new(state.repo.clone())
        .execute(page)
        .await?;

    Ok(Json(UserListResponse {
        users: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

/// GET /api/users/{id}
pub async fn get_user<R>(
    State(state): State<UserAppState<R>>,
    Path(user_id): Path<UserId>,
) -> SocialResult<Json<UserDetailResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    let listing = GetUserUseCase::new(state.repo.clone())
        .execute(user_id)
        .await?;

    Ok(Json(UserDetailResponse {
        user: listing.into(),
    }))
}

/// PUT /api/users/profile
pub async fn update_profile<R>(
    State(state): State<UserAppState<R>>,
    auth: AuthContext,
    ValidatedJson(req): ValidatedJson<UpdateProfileRequest>,
) -> SocialResult<Json<ProfileResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    let profile = UpdateProfileUseCase::new(state.repo.clone())
        .execute(auth.user_id, req.into())
        .await?;

    Ok(Json(ProfileResponse {
        message: "Profile updated successfully",
        user: profile.into(),
    }))
}

/// GET /api/users/{id}/posts
pub async fn user_posts<R>(
    State(state): State<UserAppState<R>>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageQuery>,
) -> SocialResult<Json<PostListResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    Ok(Json(
        list_filtered(&state.repo, PostFilter::by_author(user_id), page).await?,
    ))
}

/// GET /api/users/{id}/followers
pub async fn followers<R>(
    State(state): State<UserAppState<R>>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageQuery>,
) -> SocialResult<Json<FollowersResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    validate(&page)?;

    let page = FollowUseCase::new(state.repo.clone())
        .list(user_id, FollowSide::Followers, page)
        .await?;

    Ok(Json(FollowersResponse {
        followers: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

/// GET /api/users/{id}/following
pub async fn following<R>(
    State(state): State<UserAppState<R>>,
    Path(user_id): Path<UserId>,
    Query(page): Query<PageQuery>,
) -> SocialResult<Json<FollowingResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    validate(&page)?;

    let page = FollowUseCase::new(state.repo.clone())
        .list(user_id, FollowSide::Following, page)
        .await?;

    Ok(Json(FollowingResponse {
        following: page.items.into_iter().map(Into::into).collect(),
        pagination: page.pagination,
    }))
}

/// POST /api/users/{id}/follow
pub async fn toggle_follow<R>(
    State(state): State<UserAppState<R>>,
    Path(target): Path<UserId>,
    auth: AuthContext,
) -> SocialResult<Json<FollowResponse>>
where
    R: PostRepository + UserDirectory + Clone + Send + Sync + 'static,
{
    let following = FollowUseCase::new(state.repo.clone())
        .toggle(auth.user_id, target)
        .await?;

    Ok(Json(FollowResponse {
        message: if following {
            "User followed successfully"
        } else {
            "User unfollowed successfully"
        },
        following,
    }))
}
