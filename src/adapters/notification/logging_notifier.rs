//! Reminder notifier that emits one structured log event per reminder.
//!
//! Used until a mail or messaging channel is wired in; log shippers can
//! route the `payment_reminder` target to whatever delivers the message.

use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;

use crate::domain::foundation::DomainError;
use crate::ports::{PaymentReminder, PaymentReminderNotifier};

#[derive(Debug, Default)]
pub struct LoggingReminderNotifier {
    sent: AtomicU64,
}

impl LoggingReminderNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Reminders emitted since startup.
    pub fn sent_count(&self) -> u64 {
        self.sent.load(Ordering::Relaxed)
    }
}

#[async_trait]
impl PaymentReminderNotifier for LoggingReminderNotifier {
    async fn send_payment_reminder(&self, reminder: &PaymentReminder) -> Result<(), DomainError> {
        let amount_due = reminder
            .amount_due
            .map(|amount| amount.to_string())
            .unwrap_or_default();
        tracing::info!(
            target: "payment_reminder",
            client_id = %reminder.client_id,
            client_name = %reminder.client_name,
            email = %reminder.email,
            amount_due = %amount_due,
            due_date = %reminder.due_date,
            "Payment due soon"
        );
        self.sent.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}
