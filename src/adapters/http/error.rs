//! API error type that converts billing errors to HTTP responses.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::domain::billing::BillingError;
use crate::domain::foundation::DomainError;

/// Standard error response body.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub error_code: String,
    /// Human-readable error message.
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

impl ErrorResponse {
    pub fn new(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: None,
        }
    }

    pub fn with_details(
        error_code: impl Into<String>,
        message: impl Into<String>,
        details: serde_json::Value,
    ) -> Self {
        Self {
            error_code: error_code.into(),
            message: message.into(),
            details: Some(details),
        }
    }
}

/// Wraps a `BillingError` for the REST endpoints.
#[derive(Debug)]
pub struct ApiError(pub BillingError);

impl From<BillingError> for ApiError {
    fn from(err: BillingError) -> Self {
        Self(err)
    }
}

impl From<DomainError> for ApiError {
    fn from(err: DomainError) -> Self {
        Self(BillingError::from(err))
    }
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match &self.0 {
            BillingError::NotFound { .. } => StatusCode::NOT_FOUND,
            BillingError::InvalidArgument { .. } => StatusCode::BAD_REQUEST,
            BillingError::InvalidState(_) => StatusCode::CONFLICT,
            BillingError::ExternalProvider(_) => StatusCode::BAD_GATEWAY,
            BillingError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            tracing::error!(error = %self.0, status = status.as_u16(), "Request failed");
        }

        let body = match &self.0 {
            BillingError::InvalidArgument { field, message } => ErrorResponse::with_details(
                self.0.code().to_string(),
                message.clone(),
                serde_json::json!({ "field": field }),
            ),
            other => ErrorResponse::new(other.code().to_string(), other.to_string()),
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::Entity;

    #[test]
    fn maps_each_error_kind_to_its_status() {
        let cases = [
            (
                BillingError::NotFound {
                    entity: Entity::Client,
                    id: "x".to_string(),
                },
                StatusCode::NOT_FOUND,
            ),
            (
                BillingError::invalid_argument("plan_type", "unknown"),
                StatusCode::BAD_REQUEST,
            ),
            (
                BillingError::invalid_state("no active subscription"),
                StatusCode::CONFLICT,
            ),
            (
                BillingError::external_provider("timeout"),
                StatusCode::BAD_GATEWAY,
            ),
            (
                BillingError::unexpected("boom"),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];

        for (error, expected) in cases {
            assert_eq!(ApiError(error).status(), expected);
        }
    }

    #[test]
    fn into_response_uses_mapped_status() {
        let response = ApiError(BillingError::invalid_state("already voided")).into_response();
        assert_eq!(response.status(), StatusCode::CONFLICT);
    }

    #[test]
    fn error_response_skips_empty_details() {
        let json = serde_json::to_value(ErrorResponse::new("CLIENT_NOT_FOUND", "gone")).unwrap();
        assert!(json.get("details").is_none());
        assert_eq!(json["error_code"], "CLIENT_NOT_FOUND");
    }
}
