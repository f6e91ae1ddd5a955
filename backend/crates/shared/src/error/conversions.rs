//! Error conversions
//!
//! `?` on validator and sqlx results lands in [`AppError`] with the status the
//! client contract expects.

use super::app_error::AppError;

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        AppError::validation(crate::validation::field_errors(&err))
    }
}

/// Map a Postgres SQLSTATE to the client-facing error
///
/// See <https://www.postgresql.org/docs/current/errcodes-appendix.html>
#[cfg(feature = "sqlx")]
fn from_sqlstate(code: &str) -> AppError {
    match code {
        "23505" => AppError::duplicate("A record with this value already exists"),
        "23503" => AppError::bad_request("Foreign key constraint violation"),
        "23502" => AppError::bad_request("Required field is null"),
        "23514" => AppError::bad_request("Check constraint violation"),
        "22P02" => AppError::bad_request("Invalid identifier format"),
        // insufficient resources / operator intervention
        c if c.starts_with("53") || c.starts_with("57") => {
            AppError::service_unavailable("Database unavailable")
        }
        _ => AppError::internal("Database error"),
    }
}

#[cfg(feature = "sqlx")]
impl From<sqlx::Error> for AppError {
    fn from(err: sqlx::Error) -> Self {
        let mapped = match &err {
            sqlx::Error::RowNotFound => AppError::not_found("Record not found"),
            sqlx::Error::PoolTimedOut | sqlx::Error::PoolClosed => {
                AppError::service_unavailable("Database connection pool exhausted")
            }
            sqlx::Error::Io(_) => AppError::service_unavailable("Database connection error"),
            sqlx::Error::Database(db_err) => match db_err.code() {
                Some(code) => from_sqlstate(&code),
                None => AppError::internal("Database error"),
            },
            _ => AppError::internal("Database error"),
        };
        mapped.with_source(err)
    }
}

#[cfg(test)]
mod tests {
    use validator::Validate;

    use super::*;
    use crate::error::kind::ErrorKind;

    #[derive(Validate)]
    struct Signup {
        #[validate(email(message = "Please provide a valid email"))]
        email: String,
    }

    #[test]
    fn test_validation_errors_conversion() {
        let err: AppError = Signup {
            email: "nope".into(),
        }
        .validate()
        .unwrap_err()
        .into();
        assert_eq!(err.kind(), ErrorKind::ValidationFailed);
        assert_eq!(err.field_errors()[0].message, "Please provide a valid email");
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_sqlstate_mapping() {
        assert_eq!(from_sqlstate("23505").kind(), ErrorKind::Duplicate);
        assert_eq!(from_sqlstate("23503").message(), "Foreign key constraint violation");
        assert_eq!(from_sqlstate("57P01").kind(), ErrorKind::ServiceUnavailable);
        assert_eq!(from_sqlstate("42P01").kind(), ErrorKind::InternalServerError);
    }

    #[cfg(feature = "sqlx")]
    #[test]
    fn test_row_not_found_conversion() {
        let err: AppError = sqlx::Error::RowNotFound.into();
        assert_eq!(err.kind(), ErrorKind::NotFound);
        assert_eq!(err.source_chain().len(), 1);
    }
}
