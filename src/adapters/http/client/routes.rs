//! Axum router for client endpoints.

use axum::{
    routing::{get, put},
    Router,
};

use super::handlers::{
    create_client, delete_client, get_client, list_clients, update_available_plans,
    update_client,
};
use crate::adapters::http::state::BillingAppState;

/// Mounted at `/api/clients`.
pub fn client_routes() -> Router<BillingAppState> {
    Router::new()
        .route("/", get(list_clients).post(create_client))
        .route(
            "/:id",
            get(get_client).put(update_client).delete(delete_client),
        )
        .route("/:id/plans", put(update_available_plans))
}
