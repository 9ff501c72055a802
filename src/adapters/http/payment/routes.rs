//! Axum router for payment endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    list_client_payments, list_payments, payment_history, register_payment, set_payment_status,
};
use crate::adapters::http::state::BillingAppState;

/// Mounted at `/api/payments`.
pub fn payment_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(list_payments).post(register_payment))
        .route("/history", get(payment_history))
        .route("/client/:client_id", get(list_client_payments))
        .route("/:id", put(set_payment_status))
}
