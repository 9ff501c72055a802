//! Billing error taxonomy.
//!
//! Every handler returns exactly one of these kinds.
//!
//! # HTTP Status Mapping
//!
//! | Error | HTTP Status |
//! |-------|-------------|
//! | NotFound | 404 |
//! | InvalidArgument | 400 |
//! | InvalidState | 409 |
//! | ExternalProvider | 502 |
//! | Unexpected | 500 |

use std::fmt;

use thiserror::Error;

use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, InvoiceId, PaymentId, ValidationError,
};

/// Entities that can be reported missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Entity {
    Client,
    Payment,
    Invoice,
}

impl fmt::Display for Entity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Entity::Client => "Client",
            Entity::Payment => "Payment",
            Entity::Invoice => "Invoice",
        };
        write!(f, "{}", s)
    }
}

/// Errors surfaced by billing operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BillingError {
    #[error("{entity} not found: {id}")]
    NotFound { entity: Entity, id: String },

    #[error("Invalid {field}: {message}")]
    InvalidArgument { field: String, message: String },

    #[error("{0}")]
    InvalidState(String),

    #[error("Payment provider error: {0}")]
    ExternalProvider(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl BillingError {
    pub fn client_not_found(id: ClientId) -> Self {
        BillingError::NotFound {
            entity: Entity::Client,
            id: id.to_string(),
        }
    }

    /// No client carries the given provider subscription id.
    pub fn subscription_not_found(subscription_id: impl Into<String>) -> Self {
        BillingError::NotFound {
            entity: Entity::Client,
            id: format!("subscription {}", subscription_id.into()),
        }
    }

    pub fn payment_not_found(id: PaymentId) -> Self {
        BillingError::NotFound {
            entity: Entity::Payment,
            id: id.to_string(),
        }
    }

    pub fn invoice_not_found(id: InvoiceId) -> Self {
        BillingError::NotFound {
            entity: Entity::Invoice,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(field: impl Into<String>, message: impl Into<String>) -> Self {
        BillingError::InvalidArgument {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn invalid_state(message: impl Into<String>) -> Self {
        BillingError::InvalidState(message.into())
    }

    pub fn external_provider(message: impl Into<String>) -> Self {
        BillingError::ExternalProvider(message.into())
    }

    pub fn unexpected(message: impl Into<String>) -> Self {
        BillingError::Unexpected(message.into())
    }

    /// Returns the error code for this error.
    pub fn code(&self) -> ErrorCode {
        match self {
            BillingError::NotFound { entity, .. } => match entity {
                Entity::Client => ErrorCode::ClientNotFound,
                Entity::Payment => ErrorCode::PaymentNotFound,
                Entity::Invoice => ErrorCode::InvoiceNotFound,
            },
            BillingError::InvalidArgument { .. } => ErrorCode::ValidationFailed,
            BillingError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            BillingError::ExternalProvider(_) => ErrorCode::ExternalServiceError,
            BillingError::Unexpected(_) => ErrorCode::InternalError,
        }
    }
}

impl From<ValidationError> for BillingError {
    fn from(err: ValidationError) -> Self {
        BillingError::InvalidArgument {
            field: err.field().to_string(),
            message: err.to_string(),
        }
    }
}

impl From<DomainError> for BillingError {
    fn from(err: DomainError) -> Self {
        let id = err
            .details
            .get("id")
            .cloned()
            .unwrap_or_else(|| err.message.clone());
        match err.code {
            ErrorCode::ClientNotFound => BillingError::NotFound {
                entity: Entity::Client,
                id,
            },
            ErrorCode::PaymentNotFound => BillingError::NotFound {
                entity: Entity::Payment,
                id,
            },
            ErrorCode::InvoiceNotFound => BillingError::NotFound {
                entity: Entity::Invoice,
                id,
            },
            ErrorCode::ValidationFailed | ErrorCode::InvalidFormat => {
                BillingError::InvalidArgument {
                    field: err.details.get("field").cloned().unwrap_or_default(),
                    message: err.message,
                }
            }
            ErrorCode::InvalidStateTransition | ErrorCode::DuplicateRecord => {
                BillingError::InvalidState(err.message)
            }
            ErrorCode::ExternalServiceError => BillingError::ExternalProvider(err.message),
            ErrorCode::DatabaseError | ErrorCode::InternalError => {
                BillingError::Unexpected(err.to_string())
            }
        }
    }
}
