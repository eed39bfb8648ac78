//! Custom error types for the API service

use axum::{
    Json,
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use common::error::DatabaseError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

use crate::models::FoodType;

/// Custom error type for the API service
#[derive(Error, Debug)]
pub enum ApiError {
    /// A referenced entity does not exist
    #[error("{0} not found")]
    NotFound(String),

    /// Request or invariant violation on a named field
    #[error("Invalid {field}: {message}")]
    ValidationFailed { field: String, message: String },

    /// Missing, malformed or unresolvable credentials
    #[error("Unauthorized")]
    Unauthenticated,

    /// Authenticated but neither owner nor admin
    #[error("Forbidden")]
    Forbidden,

    /// Delete blocked by live references, or a duplicate unique field
    #[error("Conflict: {0}")]
    Conflict(String),

    /// A required collaborator record is missing (e.g. no admin account)
    #[error("Unavailable: {0}")]
    Unavailable(String),

    /// The meal planner has no candidate for a course
    #[error("No {0} recipe available")]
    NoRecipeAvailable(FoodType),

    /// Login throttled
    #[error("Too many requests")]
    TooManyRequests,

    /// Internal server error
    #[error("Internal server error")]
    Internal,

    /// Database error
    #[error("Database error: {0}")]
    Database(#[from] DatabaseError),
}

impl ApiError {
    /// Shorthand for a validation failure on `field`
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ApiError::ValidationFailed {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Shorthand for a missing entity
    pub fn not_found(what: impl Into<String>) -> Self {
        ApiError::NotFound(what.into())
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::validation("body", rejection.body_text())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        ApiError::validation("id", rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::validation("query", rejection.body_text())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::NotFound(_) => (StatusCode::NOT_FOUND, json!({ "error": self.to_string() })),
            ApiError::ValidationFailed { field, message } => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": message, "field": field }),
            ),
            ApiError::Unauthenticated => {
                (StatusCode::UNAUTHORIZED, json!({ "error": "Unauthorized" }))
            }
            ApiError::Forbidden => (StatusCode::FORBIDDEN, json!({ "error": "Forbidden" })),
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, json!({ "error": msg })),
            ApiError::Unavailable(msg) => {
                (StatusCode::SERVICE_UNAVAILABLE, json!({ "error": msg }))
            }
            ApiError::NoRecipeAvailable(_) => (
                StatusCode::UNPROCESSABLE_ENTITY,
                json!({ "error": self.to_string() }),
            ),
            ApiError::TooManyRequests => (
                StatusCode::TOO_MANY_REQUESTS,
                json!({ "error": "Too many login attempts" }),
            ),
            ApiError::Internal => (
                StatusCode::INTERNAL_SERVER_ERROR,
                json!({ "error": "Internal server error" }),
            ),
            ApiError::Database(DatabaseError::Duplicate(what)) => (
                StatusCode::CONFLICT,
                json!({ "error": format!("{} already exists", what) }),
            ),
            ApiError::Database(e) => {
                error!("Database failure: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    json!({ "error": "Database error" }),
                )
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Type alias for API results
pub type ApiResult<T> = Result<T, ApiError>;
