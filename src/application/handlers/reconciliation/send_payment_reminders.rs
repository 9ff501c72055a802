//! SendPaymentRemindersHandler - notifies clients whose payment falls due
//! within the reminder window. Does not modify any client or payment.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::billing::{BillingError, ReminderWindow};
use crate::domain::foundation::Timestamp;
use crate::ports::{ClientRepository, PaymentReminder, PaymentReminderNotifier};

/// Command to send reminders as of a given instant.
#[derive(Debug, Clone, Copy)]
pub struct SendPaymentRemindersCommand {
    pub as_of: Timestamp,
}

impl Default for SendPaymentRemindersCommand {
    fn default() -> Self {
        Self {
            as_of: Timestamp::now(),
        }
    }
}

/// Counts from one reminder run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReminderSummary {
    pub sent: usize,
    pub failed: usize,
}

/// Handler for upcoming-payment reminders.
pub struct SendPaymentRemindersHandler {
    clients: Arc<dyn ClientRepository>,
    notifier: Arc<dyn PaymentReminderNotifier>,
    window: ReminderWindow,
}

impl SendPaymentRemindersHandler {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        notifier: Arc<dyn PaymentReminderNotifier>,
        window: ReminderWindow,
    ) -> Self {
        Self {
            clients,
            notifier,
            window,
        }
    }

    pub async fn handle(
        &self,
        cmd: SendPaymentRemindersCommand,
    ) -> Result<ReminderSummary, BillingError> {
        let (from, to) = self.window.bounds(cmd.as_of);
        let due = self.clients.find_due_within(from, to).await?;

        let mut summary = ReminderSummary::default();
        for reminder in due.iter().filter_map(PaymentReminder::for_client) {
            match self.notifier.send_payment_reminder(&reminder).await {
                Ok(()) => summary.sent += 1,
                Err(e) => {
                    summary.failed += 1;
                    tracing::warn!(
                        client_id = %reminder.client_id,
                        error = %e,
                        "Payment reminder not delivered"
                    );
                }
            }
        }

        tracing::info!(sent = summary.sent, failed = summary.failed, "Payment reminders sent");
        Ok(summary)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        subscribed_client, Fixture, RecordingNotifier,
    };
    use crate::domain::billing::{BillingStatus, Client};

    async fn due_in(fx: &Fixture, email: &str, days: i64, now: Timestamp) -> Client {
        let mut client = subscribed_client(email, &format!("pre_{}", email));
        client.next_payment_due = Some(now.add_days(days));
        fx.insert_client(&client).await;
        client
    }

    #[tokio::test]
    async fn reminds_clients_due_within_window() {
        let fx = Fixture::new();
        let now = Timestamp::now();
        let soon = due_in(&fx, "soon@clinic.com", 2, now).await;
        due_in(&fx, "later@clinic.com", 10, now).await;
        let notifier = Arc::new(RecordingNotifier::default());

        let summary = SendPaymentRemindersHandler::new(
            fx.clients.clone(),
            notifier.clone(),
            ReminderWindow::default(),
        )
        .handle(SendPaymentRemindersCommand { as_of: now })
        .await
        .unwrap();

        assert_eq!(summary.sent, 1);
        let sent = notifier.sent();
        assert_eq!(sent.len(), 1);
        assert_eq!(sent[0].client_id, soon.id);
        assert_eq!(sent[0].amount_due, soon.current_plan.map(|p| p.price));
        assert_eq!(fx.client(soon.id).await.billing_status, BillingStatus::Pending);
    }

    #[tokio::test]
    async fn skips_clients_already_paid() {
        let fx = Fixture::new();
        let now = Timestamp::now();
        let mut client = subscribed_client("paid@clinic.com", "pre_1");
        client.record_payment(now, now.add_days(1), now);
        fx.insert_client(&client).await;
        let notifier = Arc::new(RecordingNotifier::default());

        let summary = SendPaymentRemindersHandler::new(
            fx.clients.clone(),
            notifier.clone(),
            ReminderWindow::default(),
        )
        .handle(SendPaymentRemindersCommand { as_of: now })
        .await
        .unwrap();

        assert_eq!(summary.sent, 0);
    }

    #[tokio::test]
    async fn delivery_failure_is_counted_and_batch_continues() {
        let fx = Fixture::new();
        let now = Timestamp::now();
        due_in(&fx, "bad@clinic.com", 1, now).await;
        due_in(&fx, "good@clinic.com", 1, now).await;
        let notifier = Arc::new(RecordingNotifier::failing_for("bad@clinic.com"));

        let summary = SendPaymentRemindersHandler::new(
            fx.clients.clone(),
            notifier.clone(),
            ReminderWindow::default(),
        )
        .handle(SendPaymentRemindersCommand { as_of: now })
        .await
        .unwrap();

        assert_eq!(summary, ReminderSummary { sent: 1, failed: 1 });
        assert_eq!(notifier.sent()[0].email, "good@clinic.com");
    }
}
