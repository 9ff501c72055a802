//! Outbound payment reminders.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::billing::Client;
use crate::domain::foundation::{ClientId, DomainError, Money, Timestamp};

/// What a reminder tells the client.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PaymentReminder {
    pub client_id: ClientId,
    pub client_name: String,
    pub email: String,
    pub amount_due: Option<Money>,
    pub due_date: Timestamp,
}

impl PaymentReminder {
    /// Builds the reminder for a client that has a due date.
    pub fn for_client(client: &Client) -> Option<Self> {
        let due_date = client.next_payment_due?;
        Some(Self {
            client_id: client.id,
            client_name: client.name.clone(),
            email: client.email.clone(),
            amount_due: client.current_plan.as_ref().map(|plan| plan.price),
            due_date,
        })
    }
}

#[async_trait]
pub trait PaymentReminderNotifier: Send + Sync {
    async fn send_payment_reminder(&self, reminder: &PaymentReminder) -> Result<(), DomainError>;
}
