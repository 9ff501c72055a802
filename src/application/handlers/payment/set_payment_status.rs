//! SetPaymentStatusHandler - operator or provider-driven status change.
//!
//! Approving a payment settles the owning client, with the next due date
//! anchored to the payment's own date rather than to the time of approval.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Payment, PaymentStatus};
use crate::domain::foundation::{PaymentId, Timestamp};
use crate::ports::{ClientRepository, PaymentRepository};

/// Command to override a payment's status.
#[derive(Debug, Clone)]
pub struct SetPaymentStatusCommand {
    pub payment_id: PaymentId,
    /// Raw status as received; parsed here so bad input is InvalidArgument.
    pub status: String,
}

/// Handler for operator status changes on payments.
pub struct SetPaymentStatusHandler {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl SetPaymentStatusHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { clients, payments }
    }

    pub async fn handle(&self, cmd: SetPaymentStatusCommand) -> Result<Payment, BillingError> {
        let status: PaymentStatus = cmd.status.parse().map_err(|_| {
            BillingError::invalid_argument(
                "status",
                format!(
                    "'{}' is not one of pending, approved, rejected, refunded",
                    cmd.status
                ),
            )
        })?;

        let mut payment = self
            .payments
            .find_by_id(cmd.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(cmd.payment_id))?;

        let now = Timestamp::now();
        payment.set_status(status, now);
        self.payments.update(&payment).await?;

        if status == PaymentStatus::Approved {
            match self.clients.find_by_id(payment.client_id).await? {
                Some(mut client) => {
                    client.record_payment(payment.paid_at, payment.paid_at.add_months(1), now);
                    self.clients.update(&client).await?;
                }
                None => {
                    tracing::warn!(
                        payment_id = %payment.id,
                        client_id = %payment.client_id,
                        "Approved payment has no client on record"
                    );
                }
            }
        }

        tracing::info!(payment_id = %payment.id, status = %status, "Payment status set");
        Ok(payment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{pending_payment, subscribed_client, Fixture};
    use crate::domain::billing::BillingStatus;
    use crate::domain::foundation::ClientId;

    fn handler(fx: &Fixture) -> SetPaymentStatusHandler {
        SetPaymentStatusHandler::new(fx.clients.clone(), fx.payments.clone())
    }

    #[tokio::test]
    async fn approval_anchors_due_date_to_payment_date() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let paid_at = Timestamp::now().minus_days(10);
        let payment = pending_payment(client.id, paid_at, "TRX-1");
        fx.insert_payment(&payment).await;

        let updated = handler(&fx)
            .handle(SetPaymentStatusCommand {
                payment_id: payment.id,
                status: "approved".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(updated.status, PaymentStatus::Approved);
        let stored = fx.client(client.id).await;
        assert_eq!(stored.billing_status, BillingStatus::Paid);
        assert_eq!(stored.last_payment_at, Some(paid_at));
        assert_eq!(stored.next_payment_due, Some(paid_at.add_months(1)));
    }

    #[tokio::test]
    async fn rejection_leaves_client_untouched() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let payment = pending_payment(client.id, Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;

        handler(&fx)
            .handle(SetPaymentStatusCommand {
                payment_id: payment.id,
                status: "rejected".to_string(),
            })
            .await
            .unwrap();

        assert_eq!(fx.client(client.id).await, client);
    }

    #[tokio::test]
    async fn rejects_unknown_status() {
        let fx = Fixture::new();
        let result = handler(&fx)
            .handle(SetPaymentStatusCommand {
                payment_id: PaymentId::new(),
                status: "settled".to_string(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn fails_when_payment_missing() {
        let fx = Fixture::new();
        let result = handler(&fx)
            .handle(SetPaymentStatusCommand {
                payment_id: PaymentId::new(),
                status: "approved".to_string(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::NotFound { .. })));
    }

    #[tokio::test]
    async fn approval_without_client_still_updates_payment() {
        let fx = Fixture::new();
        let payment = pending_payment(ClientId::new(), Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;

        let updated = handler(&fx)
            .handle(SetPaymentStatusCommand {
                payment_id: payment.id,
                status: "approved".to_string(),
            })
            .await
            .unwrap();

        assert!(updated.is_approved());
    }
}
