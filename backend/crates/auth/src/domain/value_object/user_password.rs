//! User Password Value Object
//!
//! Domain wrapper around `platform::password`.
//!
//! ## Usage
//! ```rust
//! use auth::domain::value_object::user_password::{RawPassword, UserPassword};
//! use platform::password::PasswordHasher;
//!
//! let raw = RawPassword::new("arepas-con-queso".to_string()).unwrap();
//! let hashed = UserPassword::from_raw(&raw, &PasswordHasher::new(1).unwrap()).unwrap();
//! assert!(hashed.verify(&RawPassword::for_login("arepas-con-queso".to_string())));
//! ```

use platform::password::{
    ClearTextPassword, HashedPassword, PasswordHashError, PasswordHasher, PasswordPolicyError,
};
use std::fmt;

/// Raw password from user input, zeroized on drop
pub struct RawPassword(ClearTextPassword);

impl RawPassword {
    /// Password chosen at registration, policy checked
    pub fn new(raw: String) -> Result<Self, PasswordPolicyError> {
        ClearTextPassword::new(raw).map(Self)
    }

    /// Password presented at login; policy is not re-applied
    pub fn for_login(raw: String) -> Self {
        Self(ClearTextPassword::for_verification(raw))
    }

    pub(crate) fn as_clear_text(&self) -> &ClearTextPassword {
        &self.0
    }
}

impl fmt::Debug for RawPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("RawPassword([REDACTED])")
    }
}

/// Stored password hash (PHC string)
#[derive(Clone, PartialEq, Eq)]
pub struct UserPassword(HashedPassword);

impl UserPassword {
    pub fn from_raw(raw: &RawPassword, hasher: &PasswordHasher) -> Result<Self, PasswordHashError> {
        hasher.hash(raw.as_clear_text()).map(Self)
    }

    pub fn from_phc(phc: impl Into<String>) -> Result<Self, PasswordHashError> {
        HashedPassword::from_phc_string(phc).map(Self)
    }

    pub fn as_phc_string(&self) -> &str {
        self.0.as_phc_string()
    }

    pub fn verify(&self, raw: &RawPassword) -> bool {
        self.0.verify(raw.as_clear_text())
    }
}

impl fmt::Debug for UserPassword {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("UserPassword([HASH])")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_roundtrip_through_phc() {
        let hasher = PasswordHasher::new(1).unwrap();
        let raw = RawPassword::new("bandeja-paisa".to_string()).unwrap();
        let stored = UserPassword::from_raw(&raw, &hasher).unwrap();

        let loaded = UserPassword::from_phc(stored.as_phc_string()).unwrap();
        assert!(loaded.verify(&RawPassword::for_login("bandeja-paisa".to_string())));
        assert!(!loaded.verify(&RawPassword::for_login("ajiaco".to_string())));
    }

    #[test]
    fn test_policy_applies_only_at_registration() {
        assert!(RawPassword::new("abc".to_string()).is_err());
        // Short input at login simply fails verification later
        let _ = RawPassword::for_login("abc".to_string());
    }

    #[test]
    fn test_debug_redacted() {
        let raw = RawPassword::for_login("secret-value".to_string());
        assert!(!format!("{raw:?}").contains("secret-value"));
    }
}
