//! Axum router for subscription endpoints.

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers::{
    cancel_subscription, create_subscription, get_subscription_status,
    reactivate_subscription, update_subscription,
};
use crate::adapters::http::state::BillingAppState;

/// Mounted at `/api/subscriptions`.
pub fn subscription_routes() -> Router<BillingAppState> {
    Router::new()
        .route(
            "/client/:id",
            get(get_subscription_status)
                .post(create_subscription)
                .put(update_subscription)
                .delete(cancel_subscription),
        )
        .route("/client/:id/reactivate", post(reactivate_subscription))
}
