//! HTTP adapter for payment endpoints.
//!
//! - `GET /api/payments` - All payments, newest first
//! - `POST /api/payments` - Register a manual payment
//! - `PUT /api/payments/:id` - Set a payment's status
//! - `GET /api/payments/client/:client_id` - One client's payments
//! - `GET /api/payments/history` - Filtered by client, date range and status

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::payment_routes;
