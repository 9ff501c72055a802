//! PostgreSQL adapters.
//!
//! Each repository owns a `PgPool` clone and maps rows through a private
//! `*Row` struct. Schema lives in `migrations/`.

mod client_repository;
mod invoice_repository;
mod payment_repository;

pub use client_repository::PostgresClientRepository;
pub use invoice_repository::PostgresInvoiceRepository;
pub use payment_repository::PostgresPaymentRepository;

use std::fmt::Display;
use std::str::FromStr;

use crate::domain::foundation::{DomainError, ErrorCode};

/// Builds a `map_err` closure that wraps a driver error as `DatabaseError`.
pub(crate) fn db_error(action: &'static str) -> impl Fn(sqlx::Error) -> DomainError {
    move |e| DomainError::new(ErrorCode::DatabaseError, format!("Failed to {}: {}", action, e))
}

/// Parses a text column into its domain enum.
pub(crate) fn parse_column<T>(column: &str, value: &str) -> Result<T, DomainError>
where
    T: FromStr,
    T::Err: Display,
{
    value.parse().map_err(|e: T::Err| {
        DomainError::database(format!("Invalid {} value '{}': {}", column, value, e))
    })
}
