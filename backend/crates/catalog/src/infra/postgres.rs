//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::{PostId, RestaurantId, UserId};
use kernel::pagination::PageQuery;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{
    NearbyRestaurant, PostPreview, Restaurant, RestaurantCounts, RestaurantDetail,
    RestaurantFilter, RestaurantListing, SyncCandidate, UserSummary,
};
use crate::domain::repository::{RestaurantRepository, SyncRepository};
use crate::error::CatalogResult;

/// Restaurant columns plus the owner summary, for `restaurants r JOIN users u`
const LISTING_COLUMNS: &str = r#"
    r.id,
    r.name,
    r.address,
    r.latitude,
    r.longitude,
    r.phone,
    r.email,
    r.website,
    r.category,
    r.price_range,
    r.rating_average,
    r.is_active,
    r.is_verified,
    r.owner_id,
    r.created_at,
    r.updated_at,
    u.username AS owner_username,
    u.full_name AS owner_full_name,
    u.avatar_url AS owner_avatar_url
"#;

const COUNT_COLUMNS: &str = r#"
    (SELECT COUNT(*) FROM posts p WHERE p.restaurant_id = r.id) AS post_count,
    (SELECT COUNT(*) FROM user_favorites f WHERE f.restaurant_id = r.id) AS favorite_count
"#;

/// `$1` category, `$2` price range, `$3` ILIKE pattern
const FILTER_CLAUSE: &str = r#"
    r.is_active
    AND ($1::text IS NULL OR r.category = $1)
    AND ($2::smallint IS NULL OR r.price_range = $2)
    AND ($3::text IS NULL OR r.name ILIKE $3 OR r.address ILIKE $3 OR r.category ILIKE $3)
"#;

#[derive(Clone)]
pub struct PgCatalogRepository {
    pool: PgPool,
}

impl PgCatalogRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    async fn fetch_counts(&self, restaurant_id: RestaurantId) -> CatalogResult<RestaurantCounts> {
        let (posts, favorites) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT
                (SELECT COUNT(*) FROM posts WHERE restaurant_id = $1),
                (SELECT COUNT(*) FROM user_favorites WHERE restaurant_id = $1)
            "#,
        )
        .bind(restaurant_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(RestaurantCounts { posts, favorites })
    }

    async fn fetch_post_previews(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Vec<PostPreview>> {
        let rows = sqlx::query_as::<_, PostPreviewRow>(
            r#"
            SELECT
                p.id,
                p.content,
                p.image_url,
                p.rating,
                p.created_at,
                u.id AS author_id,
                u.username AS author_username,
                u.full_name AS author_full_name,
                u.avatar_url AS author_avatar_url,
                (SELECT COUNT(*) FROM likes l WHERE l.post_id = p.id) AS like_count
            FROM posts p
            JOIN users u ON u.id = p.user_id
            WHERE p.restaurant_id = $1 AND p.is_public
            ORDER BY p.created_at DESC, p.id
            LIMIT 10
            "#,
        )
        .bind(restaurant_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(PostPreviewRow::into_preview).collect())
    }

    async fn fetch_favorited_by(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Vec<UserSummary>> {
        let rows = sqlx::query_as::<_, UserSummaryRow>(
            r#"
            SELECT u.id, u.username, u.full_name, u.avatar_url
            FROM user_favorites f
            JOIN users u ON u.id = f.user_id
            WHERE f.restaurant_id = $1
            ORDER BY f.created_at DESC, u.id
            LIMIT 5
            "#,
        )
        .bind(restaurant_id.as_uuid())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(UserSummaryRow::into_summary).collect())
    }
}

/// Escape LIKE metacharacters and wrap in `%…%`
fn like_pattern(term: &str) -> String {
    let mut out = String::with_capacity(term.len() + 2);
    out.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('%');
    out
}

// ============================================================================
// Restaurant Repository Implementation
// ============================================================================

impl RestaurantRepository for PgCatalogRepository {
    async fn list(
        &self,
        filter: &RestaurantFilter,
        page: PageQuery,
    ) -> CatalogResult<Vec<RestaurantListing>> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM restaurants r
            JOIN users u ON u.id = r.owner_id
            WHERE {FILTER_CLAUSE}
            ORDER BY r.is_verified DESC, r.rating_average DESC, r.created_at DESC, r.id
            LIMIT $4 OFFSET $5
            "#
        );
        let rows = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.price_range)
            .bind(filter.search.as_deref().map(like_pattern))
            .bind(page.limit)
            .bind(page.offset())
            .fetch_all(&self.pool)
            .await?;

        Ok(rows.into_iter().map(ListingRow::into_listing).collect())
    }

    async fn count(&self, filter: &RestaurantFilter) -> CatalogResult<i64> {
        let sql = format!("SELECT COUNT(*) FROM restaurants r WHERE {FILTER_CLAUSE}");
        let total = sqlx::query_scalar::<_, i64>(&sql)
            .bind(filter.category.as_deref())
            .bind(filter.price_range)
            .bind(filter.search.as_deref().map(like_pattern))
            .fetch_one(&self.pool)
            .await?;

        Ok(total)
    }

    async fn find_by_id(&self, restaurant_id: RestaurantId) -> CatalogResult<Option<Restaurant>> {
        Ok(self
            .find_listing(restaurant_id)
            .await?
            .map(|listing| listing.restaurant))
    }

    async fn find_listing(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantListing>> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}
            FROM restaurants r
            JOIN users u ON u.id = r.owner_id
            WHERE r.id = $1
            "#
        );
        let row = sqlx::query_as::<_, ListingRow>(&sql)
            .bind(restaurant_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        Ok(row.map(ListingRow::into_listing))
    }

    async fn find_detail(
        &self,
        restaurant_id: RestaurantId,
    ) -> CatalogResult<Option<RestaurantDetail>> {
        let Some(listing) = self.find_listing(restaurant_id).await? else {
            return Ok(None);
        };

        let (posts, favorited_by, counts) = tokio::try_join!(
            self.fetch_post_previews(restaurant_id),
            self.fetch_favorited_by(restaurant_id),
            self.fetch_counts(restaurant_id),
        )?;

        Ok(Some(RestaurantDetail {
            listing,
            posts,
            favorited_by,
            counts,
        }))
    }

    async fn create(&self, restaurant: &Restaurant) -> CatalogResult<()> {
        sqlx::query(
            r#"
            INSERT INTO restaurants (
                id,
                name,
                address,
                latitude,
                longitude,
                phone,
                email,
                website,
                category,
                price_range,
                rating_average,
                is_active,
                is_verified,
                owner_id,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            "#,
        )
        .bind(restaurant.restaurant_id.as_uuid())
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(restaurant.latitude)
        .bind(restaurant.longitude)
        .bind(&restaurant.phone)
        .bind(&restaurant.email)
        .bind(&restaurant.website)
        .bind(&restaurant.category)
        .bind(restaurant.price_range)
        .bind(restaurant.rating_average)
        .bind(restaurant.is_active)
        .bind(restaurant.is_verified)
        .bind(restaurant.owner_id.as_uuid())
        .bind(restaurant.created_at)
        .bind(restaurant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn update(&self, restaurant: &Restaurant) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE restaurants SET
                name = $2,
                address = $3,
                latitude = $4,
                longitude = $5,
                phone = $6,
                email = $7,
                website = $8,
                category = $9,
                price_range = $10,
                updated_at = $11
            WHERE id = $1
            "#,
        )
        .bind(restaurant.restaurant_id.as_uuid())
        .bind(&restaurant.name)
        .bind(&restaurant.address)
        .bind(restaurant.latitude)
        .bind(restaurant.longitude)
        .bind(&restaurant.phone)
        .bind(&restaurant.email)
        .bind(&restaurant.website)
        .bind(&restaurant.category)
        .bind(restaurant.price_range)
        .bind(restaurant.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete(&self, restaurant_id: RestaurantId) -> CatalogResult<bool> {
        let result = sqlx::query("DELETE FROM restaurants WHERE id = $1")
            .bind(restaurant_id.as_uuid())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn list_active(&self) -> CatalogResult<Vec<NearbyRestaurant>> {
        let sql = format!(
            r#"
            SELECT {LISTING_COLUMNS}, {COUNT_COLUMNS}
            FROM restaurants r
            JOIN users u ON u.id = r.owner_id
            WHERE r.is_active
            "#
        );
        let rows = sqlx::query_as::<_, NearbyRow>(&sql)
            .fetch_all(&self.pool)
            .await?;

        Ok(rows
            .into_iter()
            .map(|row| NearbyRestaurant {
                counts: RestaurantCounts {
                    posts: row.post_count,
                    favorites: row.favorite_count,
                },
                listing: row.listing.into_listing(),
            })
            .collect())
    }
}

// ============================================================================
// Sync Repository Implementation
// ============================================================================

impl SyncRepository for PgCatalogRepository {
    async fn find_user_id_by_user_name(&self, user_name: &str) -> CatalogResult<Option<UserId>> {
        let id = sqlx::query_scalar::<_, Uuid>("SELECT id FROM users WHERE username = $1")
            .bind(user_name)
            .fetch_optional(&self.pool)
            .await?;

        Ok(id.map(UserId::from_uuid))
    }

    async fn find_by_name_and_address(
        &self,
        name: &str,
        address: &str,
    ) -> CatalogResult<Option<RestaurantId>> {
        let id = sqlx::query_scalar::<_, Uuid>(
            "SELECT id FROM restaurants WHERE name = $1 AND address = $2 ORDER BY created_at, id LIMIT 1",
        )
        .bind(name)
        .bind(address)
        .fetch_optional(&self.pool)
        .await?;

        Ok(id.map(RestaurantId::from_uuid))
    }

    async fn refresh_from_source(
        &self,
        restaurant_id: RestaurantId,
        candidate: &SyncCandidate,
        at: DateTime<Utc>,
    ) -> CatalogResult<()> {
        sqlx::query(
            r#"
            UPDATE restaurants SET
                phone = COALESCE($2, phone),
                website = COALESCE($3, website),
                category = $4,
                latitude = $5,
                longitude = $6,
                updated_at = $7
            WHERE id = $1
            "#,
        )
        .bind(restaurant_id.as_uuid())
        .bind(&candidate.phone)
        .bind(&candidate.website)
        .bind(&candidate.category)
        .bind(candidate.latitude)
        .bind(candidate.longitude)
        .bind(at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn delete_all(&self) -> CatalogResult<u64> {
        let result = sqlx::query("DELETE FROM restaurants")
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct ListingRow {
    id: Uuid,
    name: String,
    address: String,
    latitude: f64,
    longitude: f64,
    phone: String,
    email: Option<String>,
    website: Option<String>,
    category: String,
    price_range: i16,
    rating_average: f64,
    is_active: bool,
    is_verified: bool,
    owner_id: Uuid,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    owner_username: String,
    owner_full_name: String,
    owner_avatar_url: Option<String>,
}

impl ListingRow {
    fn into_listing(self) -> RestaurantListing {
        let owner_id = UserId::from_uuid(self.owner_id);
        RestaurantListing {
            owner: UserSummary {
                user_id: owner_id,
                user_name: self.owner_username,
                full_name: self.owner_full_name,
                avatar_url: self.owner_avatar_url,
            },
            restaurant: Restaurant {
                restaurant_id: RestaurantId::from_uuid(self.id),
                name: self.name,
                address: self.address,
                latitude: self.latitude,
                longitude: self.longitude,
                phone: self.phone,
                email: self.email,
                website: self.website,
                category: self.category,
                price_range: self.price_range,
                rating_average: self.rating_average,
                is_active: self.is_active,
                is_verified: self.is_verified,
                owner_id,
                created_at: self.created_at,
                updated_at: self.updated_at,
            },
        }
    }
}

#[derive(sqlx::FromRow)]
struct NearbyRow {
    #[sqlx(flatten)]
    listing: ListingRow,
    post_count: i64,
    favorite_count: i64,
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

#[derive(sqlx::FromRow)]
struct PostPreviewRow {
    id: Uuid,
    content: String,
    image_url: Option<String>,
    rating: Option<i16>,
    created_at: DateTime<Utc>,
    author_id: Uuid,
    author_username: String,
    author_full_name: String,
    author_avatar_url: Option<String>,
    like_count: i64,
}

impl PostPreviewRow {
    fn into_preview(self) -> PostPreview {
        PostPreview {
            post_id: PostId::from_uuid(self.id),
            author: UserSummary {
                user_id: UserId::from_uuid(self.author_id),
                user_name: self.author_username,
                full_name: self.author_full_name,
                avatar_url: self.author_avatar_url,
            },
            content: self.content,
            image_url: self.image_url,
            rating: self.rating,
            like_count: self.like_count,
            created_at: self.created_at,
        }
    }
}
