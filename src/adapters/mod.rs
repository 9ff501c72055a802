//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the billing core to external systems:
//! - `memory` - In-memory repositories for tests and database-less runs
//! - `postgres` - `sqlx` repositories
//! - `mercadopago` - Payment provider client, webhook signatures, test double
//! - `notification` - Payment reminder delivery
//! - `http` - axum REST API
//! - `scheduler` - Daily reconciliation jobs

pub mod http;
pub mod memory;
pub mod mercadopago;
pub mod notification;
pub mod postgres;
pub mod scheduler;

pub use memory::{InMemoryClientRepository, InMemoryInvoiceRepository, InMemoryPaymentRepository};
pub use mercadopago::{MercadoPagoAdapter, MercadoPagoConfig, MockPaymentProvider};
pub use notification::LoggingReminderNotifier;
pub use postgres::{PostgresClientRepository, PostgresInvoiceRepository, PostgresPaymentRepository};
