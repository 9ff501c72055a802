//! HTTP handler for MercadoPago notifications.
//!
//! The provider retries anything that is not a 2xx, so every processed
//! notification answers 200, including ignored event types. A missing
//! client answers 404 and any other failure 500.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::adapters::http::error::ErrorResponse;
use crate::adapters::http::state::BillingAppState;
use crate::adapters::mercadopago::WebhookNotification;
use crate::application::handlers::HandleProviderWebhookCommand;
use crate::domain::billing::BillingError;

pub const SIGNATURE_HEADER: &str = "x-signature";
pub const REQUEST_ID_HEADER: &str = "x-request-id";

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn error_response(status: StatusCode, code: &str, message: impl Into<String>) -> Response {
    (status, Json(ErrorResponse::new(code, message))).into_response()
}

/// POST /api/webhooks/mercadopago
pub async fn handle_mercadopago_webhook(
    State(state): State<BillingAppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    let notification: WebhookNotification = match serde_json::from_slice(&body) {
        Ok(n) => n,
        Err(e) => {
            tracing::warn!(error = %e, "Unreadable webhook body");
            return error_response(StatusCode::BAD_REQUEST, "INVALID_BODY", e.to_string());
        }
    };
    let data_id = notification.data_id();

    if let Some(verifier) = &state.webhook_verifier {
        if let Err(e) = verifier.verify(
            header(&headers, SIGNATURE_HEADER),
            header(&headers, REQUEST_ID_HEADER),
            data_id.as_deref(),
        ) {
            tracing::warn!(error = %e, "Rejected webhook signature");
            return error_response(
                StatusCode::UNAUTHORIZED,
                "INVALID_WEBHOOK_SIGNATURE",
                e.to_string(),
            );
        }
    }

    let event_type = notification.event_type.unwrap_or_default();
    let cmd = HandleProviderWebhookCommand {
        event_type: event_type.clone(),
        data_id: data_id.unwrap_or_default(),
    };

    match state.webhook_handler().handle(cmd).await {
        Ok(outcome) => (StatusCode::OK, Json(outcome)).into_response(),
        Err(BillingError::NotFound { entity, id }) => {
            tracing::warn!(event_type = %event_type, %entity, %id, "Webhook target not found");
            error_response(
                StatusCode::NOT_FOUND,
                "NOT_FOUND",
                format!("{} not found: {}", entity, id),
            )
        }
        Err(e) => {
            tracing::error!(event_type = %event_type, error = %e, "Webhook processing failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "WEBHOOK_FAILED",
                e.to_string(),
            )
        }
    }
}
