//! HTTP adapter for client endpoints.
//!
//! - `GET /api/clients` - List clients
//! - `POST /api/clients` - Register a client
//! - `GET /api/clients/:id` - Get one client
//! - `PUT /api/clients/:id` - Edit contact, program or status
//! - `DELETE /api/clients/:id` - Delete a client with no billing history
//! - `PUT /api/clients/:id/plans` - Replace the plan catalog

pub mod dto;
pub mod handlers;
pub mod routes;

pub use dto::*;
pub use routes::client_routes;
