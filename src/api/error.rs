use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use std::fmt;

use super::ApiResponse;
use crate::services::{PassengerError, SiteError, TripError};

#[derive(Debug)]
pub enum ApiError {
    NotFound(String),

    ValidationError(String),

    /// The operation would violate an invariant (e.g. a counter at its floor).
    InvalidState(String),

    Conflict(String),

    Unauthorized(String),

    Forbidden(String),

    /// The store is unreachable or timed out. Retrying is the caller's call.
    ServiceUnavailable(String),

    /// A multi-step operation may have partially completed; safe to retry.
    PartialFailure(String),

    DatabaseError(String),

    InternalError(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
            ApiError::ValidationError(msg) => write!(f, "Validation error: {}", msg),
            ApiError::InvalidState(msg) => write!(f, "Invalid state: {}", msg),
            ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
            ApiError::Unauthorized(msg) => write!(f, "Unauthorized: {}", msg),
            ApiError::Forbidden(msg) => write!(f, "Forbidden: {}", msg),
            ApiError::ServiceUnavailable(msg) => write!(f, "Service unavailable: {}", msg),
            ApiError::PartialFailure(msg) => write!(f, "Partial failure: {}", msg),
            ApiError::DatabaseError(msg) => write!(f, "Database error: {}", msg),
            ApiError::InternalError(msg) => write!(f, "Internal error: {}", msg),
        }
    }
}

impl std::error::Error for ApiError {}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, error_message) = match &self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            ApiError::ValidationError(msg) | ApiError::InvalidState(msg) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            ApiError::Conflict(msg) => (StatusCode::CONFLICT, msg.clone()),
            ApiError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            ApiError::Forbidden(msg) => (StatusCode::FORBIDDEN, msg.clone()),
            ApiError::ServiceUnavailable(msg) => {
                tracing::error!("Store unavailable: {}", msg);
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "The data store is unavailable".to_string(),
                )
            }
            ApiError::PartialFailure(msg) => {
                tracing::error!("Partial failure: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The operation may have partially completed; please retry".to_string(),
                )
            }
            ApiError::DatabaseError(msg) => {
                tracing::error!("Database error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            ApiError::InternalError(msg) => {
                tracing::error!("Internal error: {}", msg);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = ApiResponse::<()>::error(error_message);
        (status, Json(body)).into_response()
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(err: anyhow::Error) -> Self {
        ApiError::InternalError(err.to_string())
    }
}

impl From<TripError> for ApiError {
    fn from(err: TripError) -> Self {
        match err {
            TripError::NotFound(_) => ApiError::NotFound(err.to_string()),
            TripError::InvalidInput(msg) => ApiError::ValidationError(msg),
            TripError::InvalidState(msg) => ApiError::InvalidState(msg),
            TripError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl From<PassengerError> for ApiError {
    fn from(err: PassengerError) -> Self {
        match err {
            PassengerError::NotFound(_) => ApiError::NotFound(err.to_string()),
            PassengerError::InvalidInput(msg) => ApiError::ValidationError(msg),
            PassengerError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
            PassengerError::PartialFailure(msg) => ApiError::PartialFailure(msg),
        }
    }
}

impl From<SiteError> for ApiError {
    fn from(err: SiteError) -> Self {
        match err {
            SiteError::InvalidInput(msg) => ApiError::ValidationError(msg),
            SiteError::Unavailable(msg) => ApiError::ServiceUnavailable(msg),
        }
    }
}

impl ApiError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ApiError::ValidationError(msg.into())
    }

    pub fn user_not_found(email: &str) -> Self {
        ApiError::NotFound(format!("User {} not found", email))
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        ApiError::InternalError(msg.into())
    }
}
