//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::{models::LifecycleError, repositories::UniqueViolation};

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// Missing, invalid or expired credentials
    #[error("Unauthorized")]
    Unauthorized,

    /// Role or ownership check failed
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Referenced entity does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Bad request with message
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Request collides with existing state
    #[error("Conflict: {0}")]
    Conflict(String),

    /// Repository or other unexpected failure
    #[error("Internal error: {0}")]
    Internal(anyhow::Error),

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] common::error::DatabaseError),
}

impl ApiError {
    pub fn not_found(what: &str) -> Self {
        ApiError::NotFound(format!("{} not found", what))
    }

    pub fn bad_request(message: impl Into<String>) -> Self {
        ApiError::BadRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::BadRequest(_) => StatusCode::BAD_REQUEST,
            ApiError::Conflict(_) => StatusCode::CONFLICT,
            ApiError::Internal(_) | ApiError::Database(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error_message = match self {
            ApiError::Unauthorized => "Unauthorized".to_string(),
            ApiError::Forbidden(msg)
            | ApiError::NotFound(msg)
            | ApiError::BadRequest(msg)
            | ApiError::Conflict(msg) => msg,
            ApiError::Internal(e) => {
                error!("Internal error: {:#}", e);
                "Internal server error".to_string()
            }
            ApiError::Database(e) => {
                error!("Database error: {}", e);
                "Database error".to_string()
            }
        };

        let body = Json(json!({
            "error": error_message,
        }));

        (status, body).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        match err.downcast::<UniqueViolation>() {
            Ok(violation) => violation.into(),
            Err(err) => ApiError::Internal(err),
        }
    }
}

impl From<UniqueViolation> for ApiError {
    fn from(violation: UniqueViolation) -> Self {
        ApiError::Conflict(violation.to_string())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::BadRequest(rejection.body_text())
    }
}

impl From<LifecycleError> for ApiError {
    fn from(err: LifecycleError) -> Self {
        match err {
            LifecycleError::AlreadyDecided(_) => ApiError::Conflict(err.to_string()),
            LifecycleError::EndDateNotSet | LifecycleError::OutOfRange => {
                ApiError::BadRequest(err.to_string())
            }
        }
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ApiError::Unauthorized.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(
            ApiError::Forbidden("no".into()).status(),
            StatusCode::FORBIDDEN
        );
        assert_eq!(ApiError::not_found("Course").status(), StatusCode::NOT_FOUND);
        assert_eq!(ApiError::bad_request("x").status(), StatusCode::BAD_REQUEST);
        assert_eq!(ApiError::Conflict("dup".into()).status(), StatusCode::CONFLICT);
        assert_eq!(
            ApiError::from(anyhow::anyhow!("boom")).status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }

    #[test]
    fn test_lifecycle_errors() {
        use crate::models::MentorshipStatus;

        let conflict = ApiError::from(LifecycleError::AlreadyDecided(MentorshipStatus::Rejected));
        assert_eq!(conflict.status(), StatusCode::CONFLICT);

        let missing = ApiError::from(LifecycleError::EndDateNotSet);
        assert!(matches!(missing, ApiError::BadRequest(ref m) if m == "Mentorship end date not set."));
    }

    #[test]
    fn test_unique_violation_is_a_conflict() {
        let err = ApiError::from(anyhow::Error::from(UniqueViolation::Username));
        assert!(matches!(err, ApiError::Conflict(ref m) if m == "Username already taken"));
        assert_eq!(
            ApiError::from(anyhow::Error::from(UniqueViolation::Email)).status(),
            StatusCode::CONFLICT
        );
    }

    #[test]
    fn test_not_found_message() {
        assert_eq!(
            ApiError::not_found("Mentorship").to_string(),
            "Not found: Mentorship not found"
        );
    }
}
