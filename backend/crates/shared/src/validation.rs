//! Request Validation
//!
//! Glue between the declarative `validator` rule sets on request DTOs and
//! the unified [`AppError`]. Rule engines stay in `validator`; this module
//! only flattens its output into a stable `[{field, message}]` list.

use std::borrow::Cow;

use serde::Serialize;
use validator::{Validate, ValidationError, ValidationErrors};

use crate::error::app_error::{AppError, AppResult};

/// Single field-level validation failure
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}

/// Flatten `validator` output into a list sorted by field name
///
/// Field names are reported in the camelCase used on the wire.
pub fn field_errors(errors: &ValidationErrors) -> Vec<FieldError> {
    let mut list: Vec<FieldError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |e| {
                let message = e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("{field} is invalid"));
                FieldError::new(field.clone(), message)
            })
        })
        .collect();
    list.sort_by(|a, b| a.field.cmp(&b.field).then_with(|| a.message.cmp(&b.message)));
    list
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = !out.is_empty();
        } else if upper {
            out.push(c.to_ascii_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

/// Run the declarative rule set of `value`
pub fn validate<T: Validate>(value: &T) -> AppResult<()> {
    value.validate().map_err(AppError::from)
}

/// Phone numbers: optional leading `+`, then digits, spaces, dashes, parentheses
pub fn phone_number(value: &str) -> Result<(), ValidationError> {
    let mut chars = value.chars().peekable();
    if chars.peek() == Some(&'+') {
        chars.next();
    }
    let mut any = false;
    for c in chars {
        if !(c.is_ascii_digit() || c == ' ' || c == '-' || c == '(' || c == ')') {
            return Err(invalid("phone", "Please provide a valid phone number"));
        }
        any = true;
    }
    if !any {
        return Err(invalid("phone", "Please provide a valid phone number"));
    }
    Ok(())
}

/// Build a `ValidationError` carrying a user-facing message
pub fn invalid(code: &'static str, message: &'static str) -> ValidationError {
    let mut err = ValidationError::new(code);
    err.message = Some(Cow::Borrowed(message));
    err
}

#[cfg(feature = "axum")]
pub use extract::ValidatedJson;

#[cfg(feature = "axum")]
mod extract {
    use axum::Json;
    use axum::extract::{FromRequest, Request};
    use serde::de::DeserializeOwned;
    use validator::Validate;

    use crate::error::app_error::AppError;

    /// JSON body that has passed its declarative rule set
    ///
    /// Rejections are rendered through the unified error envelope:
    /// malformed JSON as 400 Bad Request, rule violations as
    /// 400 Validation Failed with the field list.
    #[derive(Debug, Clone)]
    pub struct ValidatedJson<T>(pub T);

    impl<T, S> FromRequest<S> for ValidatedJson<T>
    where
        T: DeserializeOwned + Validate,
        S: Send + Sync,
    {
        type Rejection = AppError;

        async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
            let Json(value) = Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| AppError::bad_request(rejection.body_text()))?;
            super::validate(&value)?;
            Ok(Self(value))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "Username must be at least 3 characters long"))]
        username: String,
        #[validate(email(message = "Please provide a valid email address"))]
        email: String,
        #[validate(custom(function = "phone_number"))]
        phone: Option<String>,
    }

    #[test]
    fn test_phone_number() {
        assert!(phone_number("+57 (1) 555-1234").is_ok());
        assert!(phone_number("5551234").is_ok());
        assert!(phone_number("+").is_err());
        assert!(phone_number("call me").is_err());
    }

    #[test]
    fn test_field_errors_sorted() {
        let sample = Sample {
            username: "ab".into(),
            email: "nope".into(),
            phone: Some("x".into()),
        };
        let err = validate(&sample).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);

        let fields: Vec<&str> = err.field_errors().iter().map(|f| f.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "phone", "username"]);
        assert_eq!(
            err.field_errors()[2].message,
            "Username must be at least 3 characters long"
        );
    }

    #[test]
    fn test_camel_case_field_names() {
        assert_eq!(camel_case("full_name"), "fullName");
        assert_eq!(camel_case("device_info"), "deviceInfo");
        assert_eq!(camel_case("email"), "email");
    }

    #[test]
    fn test_valid_sample() {
        let sample = Sample {
            username: "alice".into(),
            email: "alice@example.com".into(),
            phone: None,
        };
        assert!(validate(&sample).is_ok());
    }
}
