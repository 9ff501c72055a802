//! Axum router for invoice endpoints.

use axum::{
    routing::{get, post, put},
    Router,
};

use super::handlers::{issue_invoice, list_client_invoices, list_invoices, void_invoice};
use crate::adapters::http::state::BillingAppState;

/// Mounted at `/api/invoices`.
pub fn invoice_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(list_invoices))
        .route("/payment/:payment_id", post(issue_invoice))
        .route("/client/:client_id", get(list_client_invoices))
        .route("/:id/void", put(void_invoice))
}
