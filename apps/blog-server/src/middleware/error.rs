//! Error handling middleware - RFC 7807 compliant responses.

use std::collections::BTreeMap;
use std::fmt;

use actix_web::{HttpResponse, ResponseError, http::StatusCode};
use blogicum_core::error::{DomainError, RepoError};
use blogicum_shared::ErrorResponse;

/// Application-level error type that converts to RFC 7807 responses.
#[derive(Debug)]
pub enum AppError {
    NotFound(String),
    BadRequest(String),
    Unauthorized,
    Forbidden(String),
    Conflict(String),
    Internal(String),
    /// Rejected form input, keyed by field name.
    Validation(BTreeMap<String, Vec<String>>),
}

impl fmt::Display for AppError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AppError::NotFound(msg) => write!(f, "Not found: {}", msg),
            AppError::BadRequest(msg) => write!(f, "Bad request: {}", msg),
            AppError::Unauthorized => write!(f, "Unauthorized"),
            AppError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            AppError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            AppError::Internal(msg) => write!(f, "Internal error: {}", msg),
            AppError::Validation(errors) => write!(f, "Validation errors: {:?}", errors),
        }
    }
}

impl ResponseError for AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized => StatusCode::UNAUTHORIZED,
            AppError::Forbidden(_) => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AppError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let error = match self {
            AppError::NotFound(detail) => ErrorResponse::not_found(detail),
            AppError::BadRequest(detail) => ErrorResponse::bad_request(detail),
            AppError::Unauthorized => ErrorResponse::unauthorized(),
            AppError::Forbidden(detail) => ErrorResponse::forbidden(detail),
            AppError::Conflict(detail) => ErrorResponse::new(409, "Conflict").with_detail(detail),
            AppError::Internal(detail) => {
                tracing::error!("Internal error: {}", detail);
                ErrorResponse::internal_error()
            }
            AppError::Validation(errors) => ErrorResponse::validation_failed(errors.clone()),
        };

        HttpResponse::build(self.status_code()).json(error)
    }
}

impl From<DomainError> for AppError {
    fn from(err: DomainError) -> Self {
        match err {
            DomainError::NotFound { entity_type, key } => {
                AppError::NotFound(format!("{} {} not found", entity_type, key))
            }
            DomainError::Forbidden(msg) => AppError::Forbidden(msg.to_string()),
            DomainError::Validation(errors) => AppError::Validation(errors.into_inner()),
            DomainError::Duplicate(msg) => AppError::Conflict(msg),
            DomainError::Internal(msg) => AppError::Internal(msg),
        }
    }
}

impl From<RepoError> for AppError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound => AppError::NotFound("Resource not found".to_string()),
            RepoError::Constraint(msg) => AppError::Conflict(msg),
            RepoError::Connection(msg) => {
                tracing::error!("Database connection error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
            RepoError::Query(msg) => {
                tracing::error!("Database query error: {}", msg);
                AppError::Internal("Database error".to_string())
            }
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::Validation(field_messages(&errors))
    }
}

/// Flatten `validator` output into field → messages.
pub fn field_messages(errors: &validator::ValidationErrors) -> BTreeMap<String, Vec<String>> {
    errors
        .field_errors()
        .into_iter()
        .map(|(field, errors)| {
            let messages = errors
                .iter()
                .map(|error| match &error.message {
                    Some(message) => message.to_string(),
                    None => error.code.to_string(),
                })
                .collect();
            (field.to_string(), messages)
        })
        .collect()
}

/// Result type alias for handlers.
pub type AppResult<T> = Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;
    use blogicum_core::FieldErrors;

    #[test]
    fn test_domain_errors_map_to_statuses() {
        let cases = [
            (DomainError::not_found("post", "42"), StatusCode::NOT_FOUND),
            (DomainError::Forbidden("nope"), StatusCode::FORBIDDEN),
            (DomainError::Duplicate("taken".into()), StatusCode::CONFLICT),
            (DomainError::Internal("boom".into()), StatusCode::INTERNAL_SERVER_ERROR),
        ];

        for (domain, status) in cases {
            assert_eq!(AppError::from(domain).status_code(), status);
        }
    }

    #[test]
    fn test_validation_keeps_fields() {
        let mut errors = FieldErrors::new();
        errors.add("title", "This field is required.");

        let app = AppError::from(DomainError::Validation(errors));

        assert_eq!(app.status_code(), StatusCode::UNPROCESSABLE_ENTITY);
        match app {
            AppError::Validation(fields) => assert!(fields.contains_key("title")),
            other => panic!("unexpected {other:?}"),
        }
    }
}
