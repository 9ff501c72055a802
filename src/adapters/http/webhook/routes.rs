//! Axum router for provider webhooks.

use axum::{routing::post, Router};

use super::handlers::handle_mercadopago_webhook;
use crate::adapters::http::state::BillingAppState;

/// Mounted at `/api/webhooks`. No user auth; optionally signature-checked.
pub fn webhook_routes() -> Router<BillingAppState> {
    Router::new().route("/mercadopago", post(handle_mercadopago_webhook))
}
