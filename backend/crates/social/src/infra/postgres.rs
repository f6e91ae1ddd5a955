//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::PageQuery;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    Post, PostDetail, PostFilter, PostListing, PostOrder, RestaurantSummary, UserCounts,
    UserListing, UserProfile, UserSummary,
};
use crate::domain::repository::{PostRepository, UserDirectory};
use crate::error::SocialResult;

/// Post columns with author, restaurant and like count, for
/// `posts p JOIN users u LEFT JOIN restaurants r`
const POST_COLUMNS: &str = r#"
    p.id,
    p.user_id,
    p.restaurant_id,
    p.content,
    p.image_url,
    p.rating,
    p.is_public,
    p.is_featured,
    p.created_at,
    p.updated_at,
    u.username AS author_username,
    u.full_name AS author_full_name,
    u.avatar_url AS author_avatar_url,
    u.bio AS author_bio,
    r.name AS restaurant_name,
    r.category AS restaurant_category,
    r.address AS restaurant_address,
    r.phone AS restaurant_phone,
    r.rating_average AS restaurant_rating_average,
    (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
"#;

const POST_FROM: &str = r#"
    posts p
    JOIN users u ON u.id = p.user_id
    LEFT JOIN restaurants r ON r.id = p.restaurant_id
"#;

/// `$1` author, `$2` restaurant, `$3` rating, `$4` featured only
const POST_FILTER: &str = r#"
    p.is_public
    AND ($1::uuid IS NULL OR p.user_id = $1)
    AND ($2::uuid IS NULL OR p.restaurant_id = $2)
    AND ($3::smallint IS NULL OR p.rating = $3)
    AND (NOT $4::boolean OR p.is_featured)
"#;

const PROFILE_COLUMNS: &str = r#"
    u.id,
    u.email,
    u.username,
    u.full_name,
    u.phone,
    u.avatar_url,
    u.bio,
    u.location_name,
    u.preferences,
    u.is_active,
    u.email_verified,
    u.created_at,
    u.updated_at
"#;

const USER_COUNT_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM posts p WHERE p.user_id = u.id) AS post_count,
    (SELECT COUNT(*) FROM likes l WHERE l.user_id = u.id) AS like_count,
    (SELECT COUNT(*) FROM follows f WHERE f.following_id = u.id) AS follower_count,
    (SELECT COUNT(*) FROM follows f WHERE f.follower_id = u.id) AS following_count
"#;

fn order_clause(order: PostOrder) -> &'static str {
    match order {
        PostOrder::FeaturedFirst => "p.is_featured DESC, p.created_at DESC, p.id",
        PostOrder::Newest => "p.created_at DESC, p.id",
    }
}

#[derive(Clone)]
pub struct PgSocialRepository {
    pool: PgPool,
}

impl PgSocialRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_post_row(&self, post_id: PostId) -> SocialResult<Option<PostRow>> {
        let sql = format!("SELECT {POST_COLUMNS} FROM {POST_FROM} WHERE p.id = $1");
        let row = sqlx::query_as::<_, PostRow>(&sql)
            .bind(post_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row)
    }

    async fn fetch_recent_likes(&self, post_id: PostId) -> SocialResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM likes l
            JOIN users u ON u.id = l.user_id
            WHERE l.post_id = $1
            ORDER BY l.created_at DESC, u.id
            LIMIT 10
            "#,
        )
        .bind(post_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }
}

// ============================================================================
// Post Repository Implementation
// ============================================================================

impl PostRepository for PgSocialRepository {
    async fn list_posts(
        &self,
        filter: &PostFilter,
        page: PageQuery,
    ) -> SocialResult<Vec<PostListing>> {
        let sql = format!(
            r#"
            SELECT {POST_COLUMNS}
            FROM {POST_FROM}
            WHERE {POST_FILTER}
            ORDER BY {order}
            LIMIT $5 OFFSET $6
            "#,
            order = order_clause(filter.order),
        );
        let rows = sqlx::query_as::<_, PostRow>(&sql)
            .bind(filter.user_id.map(UserId::into_uuid))
            .bind(filter.restaurant_id.map(RestaurantId::into_uuid))
            .bind(filter.rating)
            .bind(filter.featured_only)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(|row| row.into_listing().0).collect())
    }

    async fn count_posts(&self, filter: &PostFilter) -> SocialResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM posts p WHERE {POST_FILTER}");
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.user_id.map(UserId::into_uuid))
            .bind(filter.restaurant_id.map(RestaurantId::into_uuid))
            .bind(filter.rating)
            .bind(filter.featured_only)
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_post(&self, post_id: PostId) -> SocialResult<Option<Post>> {
        Ok(self
            .find_post_listing(post_id)
            .await?
            .map(|listing| listing.post))
    }

    async fn find_post_listing(&self, post_id: PostId) -> SocialResult<Option<PostListing>> {
        Ok(self
            .fetch_post_row(post_id)
            .await?
            .map(|row| row.into_listing().0))
    }

    async fn find_post_detail(&self, post_id: PostId) -> SocialResult<Option<PostDetail>> {
        let (row, recent_likes) = tokio::try_join!(
            self.fetch_post_row(post_id),
            self.fetch_recent_likes(post_id)
        )?;

        Ok(row.map(|row| {
            let (listing, author_bio) = row.into_listing();
            PostDetail {
                listing,
                author_bio,
                recent_likes,
            }
        }))
    }

    async fn create_post(&self, post: &Post) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO posts (
                id,
                user_id,
                restaurant_id,
                content,
                image_url,
                rating,
                is_public,
                is_featured,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(post.user_id.as_uuid())
        .bind(post.restaurant_id.map(RestaurantId::into_uuid))
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.rating)
        .bind(post.is_public)
        .bind(post.is_featured)
        .bind(post.created_at)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update_post(&self, post: &Post) -> SocialResult<()> {
        sqlx::query(
            r#"
            UPDATE posts SET
                content = $2,
                image_url = $3,
                rating = $4,
                is_public = $5,
                updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(post.post_id.as_uuid())
        .bind(&post.content)
        .bind(&post.image_url)
        .bind(post.rating)
        .bind(post.is_public)
        .bind(post.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_post(&self, post_id: PostId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM posts WHERE id = $1")
            .bind(post_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn add_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO likes (post_id, user_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id, post_id) DO NOTHING
            "#,
        )
        .bind(post_id.as_uuid())
        .bind(user_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_like(&self, post_id: PostId, user_id: UserId) -> SocialResult<bool> {
        let result = sqlx::query("DELETE FROM likes WHERE post_id = $1 AND user_id = $2")
            .bind(post_id.as_uuid())
            .bind(user_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// User Directory Implementation
// ============================================================================

impl UserDirectory for PgSocialRepository {
    async fn list_users(&self, page: PageQuery) -> SocialResult<Vec<UserListing>> {
        let sql = format!(
            r#"
            SELECT {PROFILE_COLUMNS}, {USER_COUNT_COLUMNS}
            FROM users u
            ORDER BY u.created_at DESC, u.id
            LIMIT $1 OFFSET $2
            "#
        );
        let rows = sqlx::query_as::<_, UserListingRow>(&sql)
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(UserListingRow::into_listing).collect())
    }

    async fn count_users(&self) -> SocialResult<i64> {
        let total = sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_user_listing(&self, user_id: UserId) -> SocialResult<Option<UserListing>> {
        let sql = format!(
            "SELECT {PROFILE_COLUMNS}, {USER_COUNT_COLUMNS} FROM users u WHERE u.id = $1"
        );
        let row = sqlx::query_as::<_, UserListingRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(UserListingRow::into_listing))
    }

    async fn find_profile(&self, user_id: UserId) -> SocialResult<Option<UserProfile>> {
        let sql = format!("SELECT {PROFILE_COLUMNS} FROM users u WHERE u.id = $1");
        let row = sqlx::query_as::<_, ProfileRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ProfileRow::into_profile))
    }

    async fn update_profile(&self, profile: &UserProfile) -> SocialResult<()> {
        sqlx::query(
            r#"
            UPDATE users SET
                full_name = $2,
                phone = $3,
                bio = $4,
                location_name = $5,
                preferences = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(profile.user_id.as_uuid())
        .bind(&profile.full_name)
        .bind(&profile.phone)
        .bind(&profile.bio)
        .bind(&profile.location_name)
        .bind(&profile.preferences)
        .bind(profile.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn user_exists(&self, user_id: UserId) -> SocialResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE id = $1)")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn list_followers(
        &self,
        user_id: UserId,
        page: PageQuery,
    ) -> SocialResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.follower_id
            WHERE f.following_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }

    async fn count_followers(&self, user_id: UserId) -> SocialResult<i64> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE following_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    async fn list_following(
        &self,
        user_id: UserId,
        page: PageQuery,
    ) -> SocialResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM follows f
            JOIN users u ON u.id = f.following_id
            WHERE f.follower_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(page.limit)
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }

    async fn count_following(&self, user_id: UserId) -> SocialResult<i64> {
        let total =
            sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM follows WHERE follower_id = $1")
                .bind(user_id.as_uuid())
                .fetch_one(&self.pool)
                .await?;

        Ok(total)
    }

    async fn add_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<()> {
        sqlx::query(
            r#"
            INSERT INTO follows (follower_id, following_id, created_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (follower_id, following_id) DO NOTHING
            "#,
        )
        .bind(follower_id.as_uuid())
        .bind(following_id.as_uuid())
        .bind(Utc::now())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn remove_follow(&self, follower_id: UserId, following_id: UserId) -> SocialResult<bool> {
        let result =
            sqlx::query("DELETE FROM follows WHERE follower_id = $1 AND following_id = $2")
                .bind(follower_id.as_uuid())
                .bind(following_id.as_uuid())
                .execute(&self.pool)
                .await?;

        Ok(result.rows_affected() > 0)
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct PostRow {
    id: Uuid,
    user_id: Uuid,
    restaurant_id: Option<Uuid>,
    content: String,
    image_url: Option<String>,
    rating: Option<i16>,
    is_public: bool,
    is_featured: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    author_username: String,
    author_full_name: String,
    author_avatar_url: Option<String>,
    author_bio: Option<String>,
    restaurant_name: Option<String>,
    restaurant_category: Option<String>,
    restaurant_address: Option<String>,
    restaurant_phone: Option<String>,
    restaurant_rating_average: Option<f64>,
    like_count: i64,
}

impl PostRow {
    /// Listing plus the author's bio, which only the detail view shows
    fn into_listing(self) -> (PostListing, Option<String>) {
        let user_id = UserId::from_uuid(self.user_id);
        let restaurant = match (self.restaurant_id, self.restaurant_name) {
            (Some(id), Some(name)) => Some(RestaurantSummary {
                restaurant_id: RestaurantId::from_uuid(id),
                name,
                category: self.restaurant_category.unwrap_or_default(),
                address: self.restaurant_address.unwrap_or_default(),
                phone: self.restaurant_phone.unwrap_or_default(),
                rating_average: self.restaurant_rating_average.unwrap_or_default(),
            }),
            _ => None,
        };

        let listing = PostListing {
            post: Post {
                post_id: PostId::from_uuid(self.id),
                user_id,
                restaurant_id: self.restaurant_id.map(RestaurantId::from_uuid),
                content: self.content,
                image_url: self.image_url,
                rating: self.rating,
                is_public: self.is_public,
                is_featured: self.is_featured,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
            author: UserSummary {
                user_id,
                user_name: self.author_username,
                full_name: self.author_full_name,
                avatar_url: self.author_avatar_url,
            },
            restaurant,
            like_count: self.like_count,
        };
        (listing, self.author_bio)
    }
}

#[derive(sqlx::FromRow)]
struct ProfileRow {
    id: Uuid,
    email: String,
    username: String,
    full_name: String,
    phone: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    location_name: Option<String>,
    preferences: Value,
    is_active: bool,
    email_verified: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl ProfileRow {
    fn into_profile(self) -> UserProfile {
        UserProfile {
            user_id: UserId::from_uuid(self.id),
            email: self.email,
            user_name: self.username,
            full_name: self.full_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
            bio: self.bio,
            location_name: self.location_name,
            preferences: self.preferences,
            is_active: self.is_active,
            email_verified: self.email_verified,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserListingRow {
    #[sqlx(flatten)]
    profile: ProfileRow,
    post_count: i64,
    like_count: i64,
    follower_count: i64,
    following_count: i64,
}

impl UserListingRow {
    fn into_listing(self) -> UserListing {
        UserListing {
            profile: self.profile.into_profile(),
            counts: UserCounts {
                posts: self.post_count,
                likes: self.like_count,
                followers: self.follower_count,
                following: self.following_count,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct UserSummaryRow {
    id: Uuid,
    username: String,
    full_name: String,
    avatar_url: Option<String>,
}

impl UserSummaryRow {
    fn into_summary(self) -> UserSummary {
        UserSummary {
            user_id: UserId::from_uuid(self.id),
            user_name: self.username,
            full_name: self.full_name,
            avatar_url: self.avatar_url,
        }
    }
}
