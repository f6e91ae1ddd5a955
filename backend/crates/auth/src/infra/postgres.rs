//! PostgreSQL Repository Implementations

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::entity::{AuthSession, User};
use crate::domain::repository::{AdminRepository, AuthSessionRepository, UserRepository};
use crate::domain::value_object::{Email, UserName, UserPassword};
use crate::error::{AuthError, AuthResult};

const USER_COLUMNS: &str = r#"
    id,
    email,
    username,
    password,
    full_name,
    phone,
    avatar_url,
    bio,
    location_name,
    is_active,
    email_verified,
    phone_verified,
    preferences,
    created_at,
    updated_at
"#;

/// PostgreSQL-backed auth repository
#[derive(Clone)]
pub struct PgAuthRepository {
    pool: PgPool,
}

impl PgAuthRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Deactivate sessions that expired while the server was down
    pub async fn cleanup_expired(&self) -> AuthResult<u64> {
        let deactivated = self.deactivate_expired(Utc::now()).await?;
        tracing::info!(
            sessions_deactivated = deactivated,
            "Deactivated expired auth sessions"
        );
        Ok(deactivated)
    }

    async fn fetch_user(&self, column: &str, value: &str) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE {column} = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(value)
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }
}

// ============================================================================
// User Repository Implementation
// ============================================================================

impl UserRepository for PgAuthRepository {
    async fn create(&self, user: &User) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO users (
                id,
                email,
                username,
                password,
                full_name,
                phone,
                avatar_url,
                bio,
                location_name,
                is_active,
                email_verified,
                phone_verified,
                preferences,
                created_at,
                updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            "#,
        )
        .bind(user.user_id.as_uuid())
        .bind(user.email.as_str())
        .bind(user.user_name.as_str())
        .bind(user.password.as_phc_string())
        .bind(&user.full_name)
        .bind(&user.phone)
        .bind(&user.avatar_url)
        .bind(&user.bio)
        .bind(&user.location_name)
        .bind(user.is_active)
        .bind(user.email_verified)
        .bind(user.phone_verified)
        .bind(&user.preferences)
        .bind(user.created_at)
        .bind(user.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_by_id(&self, user_id: UserId) -> AuthResult<Option<User>> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = $1");
        let row = sqlx::query_as::<_, UserRow>(&sql)
            .bind(user_id.as_uuid())
            .fetch_optional(&self.pool)
            .await?;

        row.map(|r| r.into_user()).transpose()
    }

    async fn find_by_email(&self, email: &Email) -> AuthResult<Option<User>> {
        self.fetch_user("email", email.as_str()).await
    }

    async fn exists_by_email(&self, email: &Email) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(email.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn exists_by_user_name(&self, user_name: &UserName) -> AuthResult<bool> {
        let exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE username = $1)")
                .bind(user_name.as_str())
                .fetch_one(&self.pool)
                .await?;

        Ok(exists)
    }

    async fn touch(&self, user_id: UserId, at: DateTime<Utc>) -> AuthResult<()> {
        sqlx::query("UPDATE users SET updated_at = $2 WHERE id = $1")
            .bind(user_id.as_uuid())
            .bind(at)
            .execute(&self.pool)
            .await?;

        Ok(())
    }
}

// ============================================================================
// Admin Repository Implementation
// ============================================================================

impl AdminRepository for PgAuthRepository {
    async fn is_active_admin(&self, user_id: UserId) -> AuthResult<bool> {
        let is_admin = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT EXISTS(
                SELECT 1
                FROM admin_users a
                JOIN users u ON u.id = a.user_id
                WHERE a.user_id = $1 AND u.is_active
            )
            "#,
        )
        .bind(user_id.as_uuid())
        .fetch_one(&self.pool)
        .await?;

        Ok(is_admin)
    }
}

// ============================================================================
// Auth Session Repository Implementation
// ============================================================================

impl AuthSessionRepository for PgAuthRepository {
    async fn create(&self, session: &AuthSession) -> AuthResult<()> {
        sqlx::query(
            r#"
            INSERT INTO auth_sessions (
                id,
                user_id,
                session_token,
                platform,
                device_info,
                ip_address,
                expires_at,
                is_active,
                created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            "#,
        )
        .bind(session.session_id.as_uuid())
        .bind(session.user_id.as_uuid())
        .bind(&session.session_token)
        .bind(session.platform.as_str())
        .bind(&session.device_info)
        .bind(&session.ip_address)
        .bind(session.expires_at)
        .bind(session.is_active)
        .bind(session.created_at)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn deactivate(&self, user_id: UserId, session_token: &str) -> AuthResult<u64> {
        let result = sqlx::query(
            r#"
            UPDATE auth_sessions
            SET is_active = FALSE
            WHERE user_id = $1 AND session_token = $2 AND is_active
            "#,
        )
        .bind(user_id.as_uuid())
        .bind(session_token)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }

    async fn deactivate_expired(&self, now: DateTime<Utc>) -> AuthResult<u64> {
        let result = sqlx::query(
            "UPDATE auth_sessions SET is_active = FALSE WHERE is_active AND expires_at <= $1",
        )
        .bind(now)
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected())
    }
}

// ============================================================================
// Row Types
// ============================================================================

#[derive(sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    email: String,
    username: String,
    password: String,
    full_name: String,
    phone: Option<String>,
    avatar_url: Option<String>,
    bio: Option<String>,
    location_name: Option<String>,
    is_active: bool,
    email_verified: bool,
    phone_verified: bool,
    preferences: Value,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl UserRow {
    fn into_user(self) -> AuthResult<User> {
        let password = UserPassword::from_phc(self.password)
            .map_err(|e| AuthError::Internal(format!("Invalid password hash for {}: {e}", self.id)))?;

        Ok(User {
            user_id: UserId::from_uuid(self.id),
            email: Email::from_db(self.email),
            user_name: UserName::from_db(self.username),
            password,
            full_name: self.full_name,
            phone: self.phone,
            avatar_url: self.avatar_url,
            bio: self.bio,
            location_name: self.location_name,
            is_active: self.is_active,
            email_verified: self.email_verified,
            phone_verified: self.phone_verified,
            preferences: self.preferences,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}
