//! API Error types

use axum::{
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use nursery_core::{CatalogError, FieldError, ValidationErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// API error types
#[derive(Error, Debug)]
pub enum ApiError {
    #[error(transparent)]
    Catalog(#[from] CatalogError),

    #[error("Unauthenticated: {0}")]
    Unauthenticated(String),

    #[error("Forbidden: {0}")]
    Forbidden(String),

    #[error("Payload too large: {0}")]
    PayloadTooLarge(String),

    #[error("Internal error: {0}")]
    InternalError(String),
}

impl ApiError {
    /// Invalid input that is not tied to a single field
    pub fn bad_request(field: &str, message: impl Into<String>) -> Self {
        let mut fields = ValidationErrors::new();
        fields.push(field, message);
        ApiError::Catalog(CatalogError::validation(fields))
    }

    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Catalog(CatalogError::InvalidInput { .. }) => StatusCode::BAD_REQUEST,
            ApiError::Catalog(CatalogError::NotFound { .. }) => StatusCode::NOT_FOUND,
            ApiError::Catalog(CatalogError::Conflict(_)) => StatusCode::CONFLICT,
            ApiError::Catalog(CatalogError::StorageUnavailable(_)) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
            ApiError::Forbidden(_) => StatusCode::FORBIDDEN,
            ApiError::PayloadTooLarge(_) => StatusCode::PAYLOAD_TOO_LARGE,
            ApiError::InternalError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Catalog(e) => e.code(),
            ApiError::Unauthenticated(_) => "UNAUTHENTICATED",
            ApiError::Forbidden(_) => "FORBIDDEN",
            ApiError::PayloadTooLarge(_) => "PAYLOAD_TOO_LARGE",
            ApiError::InternalError(_) => "INTERNAL_ERROR",
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<FieldError>>,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let code = self.code().to_string();

        let (message, details) = match self {
            ApiError::Catalog(CatalogError::InvalidInput { message, fields }) => {
                let details = (!fields.is_empty()).then(|| fields.errors().to_vec());
                (message, details)
            }
            ApiError::Catalog(CatalogError::StorageUnavailable(reason)) => {
                tracing::error!(error = %reason, "Storage unavailable");
                ("Storage unavailable".to_string(), None)
            }
            ApiError::InternalError(reason) => {
                tracing::error!(error = %reason, "Internal error");
                ("Internal server error".to_string(), None)
            }
            other => (other.to_string(), None),
        };

        let body = ErrorResponse {
            code,
            message,
            details,
        };

        (status, Json(body)).into_response()
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
            ApiError::PayloadTooLarge(rejection.body_text())
        } else {
            ApiError::bad_request("", rejection.body_text())
        }
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::bad_request("", rejection.body_text())
    }
}

/// API result type
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_mapping() {
        let cases = [
            (ApiError::bad_request("name", "required"), StatusCode::BAD_REQUEST),
            (
                CatalogError::not_found("Plant", "abc").into(),
                StatusCode::NOT_FOUND,
            ),
            (CatalogError::conflict("dup").into(), StatusCode::CONFLICT),
            (
                CatalogError::storage("down").into(),
                StatusCode::SERVICE_UNAVAILABLE,
            ),
            (
                ApiError::Unauthenticated("no token".to_string()),
                StatusCode::UNAUTHORIZED,
            ),
            (ApiError::Forbidden("nope".to_string()), StatusCode::FORBIDDEN),
            (
                ApiError::PayloadTooLarge("1 MiB".to_string()),
                StatusCode::PAYLOAD_TOO_LARGE,
            ),
            (
                ApiError::InternalError("boom".to_string()),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, status) in cases {
            assert_eq!(error.status(), status, "{}", error);
            assert_eq!(error.into_response().status(), status);
        }
    }

    #[test]
    fn test_codes() {
        assert_eq!(ApiError::bad_request("id", "bad").code(), "INVALID_INPUT");
        assert_eq!(
            ApiError::Unauthenticated(String::new()).code(),
            "UNAUTHENTICATED"
        );
    }
}
