//! HTTP adapter for payment provider notifications.
//!
//! - `POST /api/webhooks/mercadopago` - Payment and preapproval events

pub mod handlers;
pub mod routes;

pub use routes::webhook_routes;
