//! API DTOs (Data Transfer Objects)

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use kernel::validation::{invalid, phone_number};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use validator::{Validate, ValidationError};

use crate::domain::entity::User;
use crate::domain::value_object::{ClientPlatform, UserName};

// ============================================================================
// Field rules
// ============================================================================

fn user_name_rule(value: &str) -> Result<(), ValidationError> {
    UserName::new(value).map(drop).map_err(|e| {
        use crate::domain::value_object::UserNameError::*;
        match e {
            TooShort => invalid("username", "Username must be at least 3 characters long"),
            TooLong => invalid("username", "Username must not exceed 30 characters"),
            InvalidCharacter => invalid(
                "username",
                "Username must only contain alphanumeric characters",
            ),
        }
    })
}

pub(crate) fn full_name_rule(value: &str) -> Result<(), ValidationError> {
    let len = value.trim().chars().count();
    if len < 2 {
        return Err(invalid("full_name", "Full name must be at least 2 characters long"));
    }
    if len > 100 {
        return Err(invalid("full_name", "Full name must not exceed 100 characters"));
    }
    Ok(())
}

fn platform_rule(value: &str) -> Result<(), ValidationError> {
    value.parse::<ClientPlatform>().map(drop).map_err(|_| {
        invalid(
            "platform",
            "Platform must be one of: mobile, web_owners, web_admin",
        )
    })
}

pub(crate) fn json_object_rule(value: &Value) -> Result<(), ValidationError> {
    if value.is_object() {
        Ok(())
    } else {
        Err(invalid("object", "Must be an object"))
    }
}

// ============================================================================
// Register
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct RegisterRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(custom(function = "user_name_rule"))]
    pub username: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters long"))]
    pub password: String,
    #[validate(custom(function = "full_name_rule"))]
    pub full_name: String,
    #[validate(custom(function = "phone_number"))]
    pub phone: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisteredUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
}

impl From<&User> for RegisteredUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            email: user.email.to_string(),
            username: user.user_name.to_string(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            is_active: user.is_active,
            email_verified: user.email_verified,
            created_at: user.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct RegisterResponse {
    pub message: &'static str,
    pub user: RegisteredUser,
    pub token: String,
}

// ============================================================================
// Login
// ============================================================================

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LoginRequest {
    #[validate(email(message = "Please provide a valid email address"))]
    pub email: String,
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
    #[validate(custom(function = "platform_rule"))]
    pub platform: Option<String>,
    #[validate(custom(function = "json_object_rule"))]
    pub device_info: Option<Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
}

impl From<&User> for LoginUser {
    fn from(user: &User) -> Self {
        Self {
            id: user.user_id,
            email: user.email.to_string(),
            username: user.user_name.to_string(),
            full_name: user.full_name.clone(),
            phone: user.phone.clone(),
            avatar_url: user.avatar_url.clone(),
            is_active: user.is_active,
            email_verified: user.email_verified,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub message: &'static str,
    pub user: LoginUser,
    pub token: String,
    pub session_token: String,
    pub platform: ClientPlatform,
}

// ============================================================================
// Logout / Refresh / Me
// ============================================================================

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LogoutRequest {
    pub session_token: Option<String>,
}

#[derive(Debug, Clone, Serialize)]
pub struct MessageResponse {
    pub message: &'static str,
}

#[derive(Debug, Clone, Serialize)]
pub struct RefreshResponse {
    pub message: &'static str,
    pub token: String,
}

/// Full profile of the caller
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CurrentUser {
    pub id: UserId,
    pub email: String,
    pub username: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location_name: Option<String>,
    pub preferences: Value,
    pub is_active: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<User> for CurrentUser {
    fn from(user: User) -> Self {
        Self {
            id: user.user_id,
            email: user.email.into_inner(),
            username: user.user_name.into(),
            full_name: user.full_name,
            phone: user.phone,
            avatar_url: user.avatar_url,
            bio: user.bio,
            location_name: user.location_name,
            preferences: user.preferences,
            is_active: user.is_active,
            email_verified: user.email_verified,
            phone_verified: user.phone_verified,
            created_at: user.created_at,
            updated_at: user.updated_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct CurrentUserResponse {
    pub user: CurrentUser,
}
