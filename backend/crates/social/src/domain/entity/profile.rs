//! User profile as seen by other users

use chrono::{DateTime, Utc};
use kernel::id::UserId;
use serde_json::Value;

use super::UserSummary;

/// Profile columns of a user; credentials never leave the auth crate
#[derive(Debug, Clone, PartialEq)]
pub struct UserProfile {
    pub user_id: UserId,
    pub email: String,
    pub user_name: String,
    pub full_name: String,
    pub phone: Option<String>,
    pub avatar_url: Option<String>,
    pub bio: Option<String>,
    pub location_name: Option<String>,
    pub preferences: Value,
    pub is_active: bool,
    pub email_verified: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Partial update; `None` leaves a field as it is, an empty string clears it
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProfileChanges {
    pub full_name: Option<String>,
    pub phone: Option<String>,
    pub bio: Option<String>,
    pub location_name: Option<String>,
    pub preferences: Option<Value>,
}

fn blank_to_none(value: String) -> Option<String> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_owned())
}

impl UserProfile {
    pub fn summary(&self) -> UserSummary {
        UserSummary {
            user_id: self.user_id,
            user_name: self.user_name.clone(),
            full_name: self.full_name.clone(),
            avatar_url: self.avatar_url.clone(),
        }
    }

    pub fn apply(&mut self, changes: ProfileChanges, at: DateTime<Utc>) {
        if let Some(full_name) = changes.full_name {
            self.full_name = full_name.trim().to_owned();
        }
        if let Some(phone) = changes.phone {
            self.phone = blank_to_none(phone);
        }
        if let Some(bio) = changes.bio {
            self.bio = blank_to_none(bio);
        }
        if let Some(location_name) = changes.location_name {
            self.location_name = blank_to_none(location_name);
        }
        if let Some(preferences) = changes.preferences {
            self.preferences = preferences;
        }
        self.updated_at = at;
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct UserCounts {
    pub posts: i64,
    pub likes: i64,
    pub followers: i64,
    pub following: i64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct UserListing {
    pub profile: UserProfile,
    pub counts: UserCounts,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn profile() -> UserProfile {
        let now = Utc::now();
        UserProfile {
            user_id: UserId::new(),
            email: "ana@example.com".into(),
            user_name: "ana".into(),
            full_name: "Ana Pérez".into(),
            phone: Some("+57 300 000 0000".into()),
            avatar_url: None,
            bio: Some("Foodie".into()),
            location_name: None,
            preferences: json!({}),
            is_active: true,
            email_verified: false,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_apply_leaves_absent_fields() {
        let mut p = profile();
        let at = p.updated_at + chrono::Duration::seconds(1);
        p.apply(
            ProfileChanges {
                location_name: Some(" Chapinero ".into()),
                ..ProfileChanges::default()
            },
            at,
        );
        assert_eq!(p.full_name, "Ana Pérez");
        assert_eq!(p.phone.as_deref(), Some("+57 300 000 0000"));
        assert_eq!(p.location_name.as_deref(), Some("Chapinero"));
        assert_eq!(p.updated_at, at);
    }

    #[test]
    fn test_apply_empty_string_clears() {
        let mut p = profile();
        p.apply(
            ProfileChanges {
                phone: Some(String::new()),
                bio: Some("  ".into()),
                preferences: Some(json!({ "diet": "vegan" })),
                ..ProfileChanges::default()
            },
            Utc::now(),
        );
        assert_eq!(p.phone, None);
        assert_eq!(p.bio, None);
        assert_eq!(p.preferences["diet"], "vegan");
    }
}
