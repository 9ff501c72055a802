//! In-memory repositories.
//!
//! Backed by `tokio::sync::RwLock`, used by tests and by local runs
//! without a database.

mod client_repository;
mod invoice_repository;
mod payment_repository;

pub use client_repository::InMemoryClientRepository;
pub use invoice_repository::InMemoryInvoiceRepository;
pub use payment_repository::InMemoryPaymentRepository;
