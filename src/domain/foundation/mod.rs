//! Foundation module - Shared domain primitives.
//!
//! Identifiers, time and money value objects, the state machine trait,
//! and the error types used across the billing domain.

mod errors;
mod ids;
mod money;
mod state_machine;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{ClientId, ExtraChargeId, InvoiceId, PaymentId};
pub use money::Money;
pub use state_machine::StateMachine;
pub use timestamp::Timestamp;
