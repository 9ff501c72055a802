//! HTTP adapters - REST API over the billing handlers.
//!
//! Each area has its own `dto`, `handlers` and `routes`; `billing_router`
//! nests them under `/api` and adds `/health`.

pub mod client;
pub mod dto;
pub mod error;
pub mod invoice;
pub mod payment;
pub mod state;
pub mod subscription;
pub mod webhook;

pub use error::{ApiError, ErrorResponse};
pub use state::BillingAppState;

use axum::http::{HeaderValue, Method};
use axum::{routing::get, Json, Router};
use serde_json::json;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// All `/api` routes, still missing their state.
pub fn api_routes() -> Router<BillingAppState> {
    Router::new()
        .nest("/clients", client::client_routes())
        .nest("/subscriptions", subscription::subscription_routes())
        .nest("/payments", payment::payment_routes())
        .nest("/invoices", invoice::invoice_routes())
        .nest("/webhooks", webhook::webhook_routes())
}

/// The complete service router with tracing and CORS applied.
pub fn billing_router(state: BillingAppState, cors_origins: &[String]) -> Router {
    Router::new()
        .route("/health", get(health))
        .nest("/api", api_routes())
        .with_state(state)
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(cors_origins))
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

/// `*` or an empty list allows any origin; otherwise only the listed ones.
pub fn cors_layer(origins: &[String]) -> CorsLayer {
    let layer = CorsLayer::new()
        .allow_methods([
            Method::GET,
            Method::POST,
            Method::PUT,
            Method::DELETE,
            Method::OPTIONS,
        ])
        .allow_headers(Any);

    if origins.is_empty() || origins.iter().any(|o| o == "*") {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = origins.iter().filter_map(|o| o.parse().ok()).collect();
    layer.allow_origin(origins)
}
