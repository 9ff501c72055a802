//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers mutate clients, payments and invoices; query handlers
//! are pure read projections.

pub mod handlers;

pub use handlers::*;
