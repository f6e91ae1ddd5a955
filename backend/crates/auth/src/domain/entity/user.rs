//! User Entity
//!
//! Credential-store view of a user. Profile columns travel with the
//! record so `/me` can be answered from a single read.

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

use crate::domain::value_object::{Email, UserName, UserPassword};

/// User entity
#[derive(Debug, Clone)]
pub struct User {
    pub user_id: UserId,
    pub email: Email,
    pub user_name: UserName,
    /// Argon2id PHC string, never serialized to clients
    pub password: UserPassword,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location_name: Option<String>,
    pub is_active: bool,
    pub email_verified: bool,
    pub phone_verified: bool,
    /// Free-form client settings (JSON object)
    pub preferences: Value,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields supplied at registration
#[derive(Debug)]
pub struct NewUser {
    pub email: Email,
    pub user_name: UserName,
    pub password: UserPassword,
    pub full_name: String,
    pub phone: Option<String>,
}

impl User {
    /// Create a freshly registered, active, unverified user
    pub fn register(new: NewUser) -> Self {
        let now = Utc::now();

        Self {
            user_id: UserId::new(),
            email: new.email,
            user_name: new.user_name,
            password: new.password,
            full_name: new.full_name,
            phone: new.phone.filter(|p| !p.trim().is_empty()),
            avatar_url: None,
            bio: None,
            location_name: None,
            is_active: true,
            email_verified: false,
            phone_verified: false,
            preferences: Value::Object(Default::default()),
            created_at: now,
            updated_at: now,
        }
    }

    pub fn can_login(&self) -> bool {
        self.is_active
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_object::RawPassword;
    use platform::password::PasswordHasher;

    #[test]
    fn test_register_defaults() {
        let raw = RawPassword::new("secret1".to_string()).unwrap();
        let user = User::register(NewUser {
            email: Email::new("ana@example.com").unwrap(),
            user_name: UserName::new("ana").unwrap(),
            password: UserPassword::from_raw(&raw, &PasswordHasher::new(1).unwrap()).unwrap(),
            full_name: "Ana Pérez".into(),
            phone: Some("  ".into()),
        });

        assert!(user.can_login());
        assert!(!user.email_verified);
        assert_eq!(user.phone, None);
        assert!(user.preferences.as_object().is_some_and(|m| m.is_empty()));
        assert_eq!(user.created_at, user.updated_at);
    }
}
