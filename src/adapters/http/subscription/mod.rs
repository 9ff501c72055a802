//! HTTP adapter for subscription endpoints, all keyed by client id.
//!
//! - `POST /api/subscriptions/client/:id` - Open a recurring agreement
//! - `DELETE /api/subscriptions/client/:id` - Cancel it
//! - `PUT /api/subscriptions/client/:id` - Change plan or price
//! - `GET /api/subscriptions/client/:id` - Local and provider status
//! - `POST /api/subscriptions/client/:id/reactivate` - Resume a suspended agreement

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::subscription_routes;
