//! HTTP adapter for invoice endpoints.
//!
//! - `GET /api/invoices` - Filtered by date range and status
//! - `POST /api/invoices/payment/:payment_id` - Issue the invoice for a payment
//! - `GET /api/invoices/client/:client_id` - One client's invoices
//! - `PUT /api/invoices/:id/void` - Void an invoice

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::invoice_routes;
