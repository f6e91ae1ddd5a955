//! Email Value Object
//!
//! Login matches the stored address exactly, so the value is trimmed
//! but its case is preserved.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Maximum email length (per RFC 5321)
const EMAIL_MAX_LENGTH: usize = 254;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EmailError {
    #[error("Email is required")]
    Empty,

    #[error("Email must not exceed {EMAIL_MAX_LENGTH} characters")]
    TooLong,

    #[error("Please provide a valid email address")]
    InvalidFormat,
}

/// Email address value object
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct Email(String);

impl Email {
    pub fn new(email: impl Into<String>) -> Result<Self, EmailError> {
        let email = email.into().trim().to_owned();

        if email.is_empty() {
            return Err(EmailError::Empty);
        }
        if email.len() > EMAIL_MAX_LENGTH {
            return Err(EmailError::TooLong);
        }
        if !Self::is_valid_format(&email) {
            return Err(EmailError::InvalidFormat);
        }

        Ok(Self(email))
    }

    /// Rebuild from a trusted store value without re-validating
    pub fn from_db(email: String) -> Self {
        Self(email)
    }

    fn is_valid_format(email: &str) -> bool {
        let Some((local, domain)) = email.split_once('@') else {
            return false;
        };
        if domain.contains('@') {
            return false;
        }

        if local.is_empty() || local.len() > 64 {
            return false;
        }

        if domain.is_empty() || !domain.contains('.') {
            return false;
        }
        if domain.starts_with('.') || domain.ends_with('.') || domain.contains("..") {
            return false;
        }

        !email.chars().any(char::is_whitespace)
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    pub fn into_inner(self) -> String {
        self.0
    }
}

impl FromStr for Email {
    type Err = EmailError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::new(s)
    }
}

impl TryFrom<String> for Email {
    type Error = EmailError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::new(value)
    }
}

impl From<Email> for String {
    fn from(email: Email) -> Self {
        email.0
    }
}

impl fmt::Display for Email {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for Email {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_email() {
        let email = Email::new("ana@example.com").unwrap();
        assert_eq!(email.as_str(), "ana@example.com");
    }

    #[test]
    fn test_email_trimmed_case_preserved() {
        let email = Email::new("  Ana.Perez@Example.COM  ").unwrap();
        assert_eq!(email.as_str(), "Ana.Perez@Example.COM");
    }

    #[test]
    fn test_invalid_emails() {
        assert_eq!(Email::new("").unwrap_err(), EmailError::Empty);
        assert_eq!(Email::new("   ").unwrap_err(), EmailError::Empty);
        for raw in [
            "invalid",
            "@example.com",
            "ana@",
            "ana@example",
            "ana@@example.com",
            "ana@.example.com",
            "ana@example..com",
            "ana maria@example.com",
        ] {
            assert_eq!(Email::new(raw).unwrap_err(), EmailError::InvalidFormat, "{raw}");
        }
    }

    #[test]
    fn test_too_long() {
        let raw = format!("{}@example.com", "a".repeat(250));
        assert_eq!(Email::new(raw).unwrap_err(), EmailError::TooLong);
    }
}
