//! Client handlers.
//!
//! ## Commands
//! - Registering a client with its plan catalog
//! - Editing contact fields
//! - Replacing the plan catalog
//! - Deleting a client with no billing history
//!
//! ## Queries
//! - Get one client
//! - List all clients

mod create_client;
mod delete_client;
mod get_client;
mod update_available_plans;
mod update_client;

// Commands
pub use create_client::{CreateClientCommand, CreateClientHandler};
pub use delete_client::{DeleteClientCommand, DeleteClientHandler};
pub use update_available_plans::{UpdateAvailablePlansCommand, UpdateAvailablePlansHandler};
pub use update_client::{UpdateClientCommand, UpdateClientHandler};

// Queries
pub use get_client::{GetClientHandler, GetClientQuery, ListClientsHandler};
