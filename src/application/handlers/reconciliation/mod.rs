//! Daily reconciliation jobs.
//!
//! Both jobs process clients one by one. A failure on one client is logged
//! and counted, and the batch carries on.

mod reconcile_overdue_payments;
mod send_payment_reminders;

pub use reconcile_overdue_payments::{
    ReconcileOverduePaymentsCommand, ReconcileOverduePaymentsHandler, ReconciliationSummary,
};
pub use send_payment_reminders::{
    ReminderSummary, SendPaymentRemindersCommand, SendPaymentRemindersHandler,
};
