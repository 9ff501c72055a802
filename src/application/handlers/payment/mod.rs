//! Payment handlers.

mod list_payments;
mod register_manual_payment;
mod set_payment_status;

pub use list_payments::{ListPaymentsHandler, ListPaymentsQuery};
pub use register_manual_payment::{RegisterManualPaymentCommand, RegisterManualPaymentHandler};
pub use set_payment_status::{SetPaymentStatusCommand, SetPaymentStatusHandler};
