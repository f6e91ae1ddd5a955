//! User Name Value Object
//!
//! ユーザー名は、ユーザーを識別するための公開ハンドル。
//!
//! ## 不変条件
//! - NFKC正規化後の ASCII 英数字のみ
//! - 長さ: 3〜30文字
//! - 大文字小文字は保持する（一意性は格納値そのもので判定）

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;
use unicode_normalization::UnicodeNormalization;

/// Minimum length for user name (in characters)
pub const USER_NAME_MIN_LENGTH: usize = 3;

/// Maximum length for user name (in characters)
pub const USER_NAME_MAX_LENGTH: usize = 30;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum UserNameError {
    #[error("Username must be at least 3 characters long")]
    TooShort,

    #[error("Username must not exceed 30 characters")]
    TooLong,

    #[error("Username must only contain alphanumeric characters")]
    InvalidCharacter,
}

/// Public user handle
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct UserName(String);

impl UserName {
    pub fn new(raw: &str) -> Result<Self, UserNameError> {
        // 全角英数字は NFKC で半角に寄せる
        let normalized: String = raw.trim().nfkc().collect();

        if !normalized.chars().all(|c| c.is_ascii_alphanumeric()) {
            return Err(UserNameError::InvalidCharacter);
        }
        // ASCII only from here, so bytes == chars
        if normalized.len() < USER_NAME_MIN_LENGTH {
            return Err(UserNameError::TooShort);
        }
        if normalized.len() > USER_NAME_MAX_LENGTH {
            return Err(UserNameError::TooLong);
        }

        Ok(Self(normalized))
    }

    pub fn from_db(value: String) -> Self {
        Self(value)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for UserName {
    type Error = UserNameError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(&value)
    }
}

impl From<UserName> for String {
    fn from(name: UserName) -> Self {
        name.0
    }
}

impl fmt::Display for UserName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid() {
        assert_eq!(UserName::new("ana123").unwrap().as_str(), "ana123");
        assert_eq!(UserName::new("  Chef42 ").unwrap().as_str(), "Chef42");
        assert!(UserName::new(&"a".repeat(30)).is_ok());
    }

    #[test]
    fn test_fullwidth_normalized() {
        assert_eq!(UserName::new("ａｎａ１").unwrap().as_str(), "ana1");
    }

    #[test]
    fn test_length_bounds() {
        assert_eq!(UserName::new("ab").unwrap_err(), UserNameError::TooShort);
        assert_eq!(UserName::new(&"a".repeat(31)).unwrap_err(), UserNameError::TooLong);
    }

    #[test]
    fn test_invalid_characters() {
        for raw in ["ana_maria", "ana.m", "ana maria", "josé", ""] {
            let err = UserName::new(raw).unwrap_err();
            if raw.is_empty() {
                assert_eq!(err, UserNameError::TooShort);
            } else {
                assert_eq!(err, UserNameError::InvalidCharacter, "{raw}");
            }
        }
    }
}
