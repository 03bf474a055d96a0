//! API error types with HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use domain::{DomainError, OrderError, Violation};
use order_store::StoreError;

/// API-level error type that maps to HTTP responses.
#[derive(Debug)]
pub enum ApiError {
    /// Resource not found.
    NotFound(String),
    /// Bad request from the client.
    BadRequest(String),
    /// Domain logic error.
    Domain(DomainError),
    /// Internal server error.
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message, violations) = match self {
            ApiError::NotFound(msg) => (StatusCode::NOT_FOUND, msg, None),
            ApiError::BadRequest(msg) => (StatusCode::BAD_REQUEST, msg, None),
            ApiError::Domain(err) => domain_error_to_response(err),
            ApiError::Internal(msg) => {
                tracing::error!(error = %msg, "internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, msg, None)
            }
        };

        let body = match violations {
            Some(violations) => serde_json::json!({
                "error": message,
                "violations": violations,
            }),
            None => serde_json::json!({ "error": message }),
        };
        (status, axum::Json(body)).into_response()
    }
}

fn domain_error_to_response(err: DomainError) -> (StatusCode, String, Option<Vec<Violation>>) {
    match err {
        DomainError::Validation(violations) => (
            StatusCode::UNPROCESSABLE_ENTITY,
            "cart validation failed".to_string(),
            Some(violations),
        ),
        DomainError::Cart(_) => (StatusCode::BAD_REQUEST, err.to_string(), None),
        DomainError::Order(
            OrderError::InvalidTransition { .. } | OrderError::CancelWindowExpired { .. },
        ) => (StatusCode::CONFLICT, err.to_string(), None),
        DomainError::Store(StoreError::NotFound(_)) => {
            (StatusCode::NOT_FOUND, err.to_string(), None)
        }
        DomainError::Store(StoreError::ConcurrencyConflict { .. }) => {
            (StatusCode::CONFLICT, err.to_string(), None)
        }
        DomainError::Store(StoreError::Unavailable(_)) | DomainError::Catalog(_) => {
            tracing::error!(error = %err, "dependency unavailable");
            (StatusCode::SERVICE_UNAVAILABLE, err.to_string(), None)
        }
        _ => (StatusCode::INTERNAL_SERVER_ERROR, err.to_string(), None),
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        ApiError::Domain(err)
    }
}
