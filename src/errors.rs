use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::store::StoreError;

/// Error body returned for every failed request.
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ErrorResponse {
    /// HTTP status category (e.g., "Not Found", "Bad Request")
    #[schema(example = "Not Found")]
    pub error: String,
    /// Human-readable error description
    #[schema(example = "Material M99 is not listed in the material master")]
    pub message: String,
    /// Underlying cause, attached verbatim for store/aggregation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// ISO 8601 timestamp when the error occurred
    #[schema(example = "2025-12-09T10:30:00.000Z")]
    pub timestamp: String,
}

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error("Store error: {0}")]
    StoreError(#[from] StoreError),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Authentication error: {0}")]
    AuthError(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Report aggregation failed: {0}")]
    AggregationFailed(String),

    #[error("External service error: {0}")]
    ExternalServiceError(String),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),
}

impl From<validator::ValidationErrors> for ServiceError {
    fn from(err: validator::ValidationErrors) -> Self {
        ServiceError::ValidationError(err.to_string())
    }
}

impl From<jsonwebtoken::errors::Error> for ServiceError {
    fn from(err: jsonwebtoken::errors::Error) -> Self {
        ServiceError::AuthError(err.to_string())
    }
}

impl ServiceError {
    /// Returns the HTTP status code for this error.
    /// Single source of truth for error-to-status mapping.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::ValidationError(_) => StatusCode::BAD_REQUEST,
            Self::AuthError(_) => StatusCode::UNAUTHORIZED,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::ExternalServiceError(_) => StatusCode::BAD_GATEWAY,
            Self::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            Self::StoreError(_) | Self::AggregationFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Message suitable for the response body. Store and aggregation failures
    /// keep a generic message; the raw cause goes into `details` instead.
    pub fn response_message(&self) -> String {
        match self {
            Self::StoreError(_) => "Backing store operation failed".to_string(),
            Self::AggregationFailed(_) => "Report aggregation failed".to_string(),
            _ => self.to_string(),
        }
    }

    /// The underlying cause, surfaced verbatim for diagnostics (store and
    /// aggregation failures only).
    pub fn response_details(&self) -> Option<String> {
        match self {
            Self::StoreError(err) => Some(err.to_string()),
            Self::AggregationFailed(cause) => Some(cause.clone()),
            _ => None,
        }
    }
}

impl IntoResponse for ServiceError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let err = ErrorResponse {
            error: status.canonical_reason().unwrap_or("Error").to_string(),
            message: self.response_message(),
            details: self.response_details(),
            timestamp: chrono::Utc::now().to_rfc3339(),
        };

        (status, Json(err)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn store_errors_map_to_500_with_details() {
        let err = ServiceError::StoreError(StoreError::Read("range A:E rejected".into()));
        assert_eq!(err.status_code(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.response_message(), "Backing store operation failed");
        assert_eq!(
            err.response_details().as_deref(),
            Some("read failed: range A:E rejected")
        );
    }

    #[test]
    fn user_facing_errors_keep_their_message() {
        let err = ServiceError::NotFound("no cases matched the query".into());
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
        assert!(err.response_message().contains("no cases matched"));
        assert!(err.response_details().is_none());
    }

    #[test]
    fn role_check_maps_to_403() {
        let err = ServiceError::Forbidden("administrators only".into());
        assert_eq!(err.status_code(), StatusCode::FORBIDDEN);
    }
}
