//! HandleProviderWebhookHandler - applies MercadoPago notifications.
//!
//! Notifications only carry a resource id; the handler fetches the full
//! resource from the provider before touching local state.
//!
//! - `payment`: mirrors the charge as a local payment and settles the client
//!   when approved
//! - `preapproval`: aligns the client lifecycle with the agreement status
//! - anything else: acknowledged with no change
//!
//! The provider re-delivers notifications, so payments are deduplicated by
//! provider transaction id.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::billing::{
    BillingError, Client, ClientStatus, Entity, NewPayment, Payment, PaymentStatus,
};
use crate::domain::foundation::{ClientId, PaymentId, Timestamp};
use crate::ports::{ClientRepository, PaymentProvider, PaymentRepository, ProviderPayment};

const PAYMENT_EVENT: &str = "payment";
const PREAPPROVAL_EVENT: &str = "preapproval";

/// Command carrying one MercadoPago notification.
#[derive(Debug, Clone)]
pub struct HandleProviderWebhookCommand {
    pub event_type: String,
    /// Provider id of the resource named by `event_type`.
    pub data_id: String,
}

/// What a notification did. Every variant is acknowledged with success.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum WebhookOutcome {
    PaymentRecorded { payment_id: PaymentId, approved: bool },
    PaymentAlreadyRecorded { payment_id: PaymentId },
    ClientStatusChanged { client_id: ClientId, status: ClientStatus },
    ClientStatusUnchanged { client_id: ClientId },
    Ignored { event_type: String },
}

/// Handler for MercadoPago notifications.
pub struct HandleProviderWebhookHandler {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl HandleProviderWebhookHandler {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        payments: Arc<dyn PaymentRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            clients,
            payments,
            provider,
        }
    }

    pub async fn handle(
        &self,
        cmd: HandleProviderWebhookCommand,
    ) -> Result<WebhookOutcome, BillingError> {
        let tracked = matches!(cmd.event_type.as_str(), PAYMENT_EVENT | PREAPPROVAL_EVENT);
        if tracked && cmd.data_id.trim().is_empty() {
            return Err(BillingError::invalid_argument(
                "data.id",
                format!("{} notification without a resource id", cmd.event_type),
            ));
        }

        let outcome = match cmd.event_type.as_str() {
            PAYMENT_EVENT => self.handle_payment(&cmd.data_id).await?,
            PREAPPROVAL_EVENT => self.handle_preapproval(&cmd.data_id).await?,
            _ => WebhookOutcome::Ignored {
                event_type: cmd.event_type.clone(),
            },
        };

        tracing::info!(
            event_type = %cmd.event_type,
            data_id = %cmd.data_id,
            outcome = ?outcome,
            "Webhook processed"
        );
        Ok(outcome)
    }

    async fn handle_payment(&self, provider_payment_id: &str) -> Result<WebhookOutcome, BillingError> {
        let remote = self.provider.get_payment(provider_payment_id).await?;

        let subscription_id = remote.preapproval_id.as_deref().ok_or_else(|| {
            BillingError::NotFound {
                entity: Entity::Client,
                id: format!("subscription for payment {}", remote.id),
            }
        })?;
        let mut client = self
            .clients
            .find_by_subscription_id(subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(subscription_id))?;

        let approved = remote.status.is_approved();
        let now = Timestamp::now();

        if let Some(mut existing) = self
            .payments
            .find_by_external_transaction_id(&remote.id)
            .await?
        {
            if !approved || existing.status == PaymentStatus::Approved {
                return Ok(WebhookOutcome::PaymentAlreadyRecorded {
                    payment_id: existing.id,
                });
            }
            existing.set_status(PaymentStatus::Approved, now);
            self.payments.update(&existing).await?;
            self.settle(&mut client, now).await?;
            return Ok(WebhookOutcome::PaymentRecorded {
                payment_id: existing.id,
                approved: true,
            });
        }

        let payment = Payment::from_provider(mirror(&remote, &client, now), approved, now)?;
        self.payments.save(&payment).await?;

        if approved {
            self.settle(&mut client, now).await?;
        }

        Ok(WebhookOutcome::PaymentRecorded {
            payment_id: payment.id,
            approved,
        })
    }

    async fn handle_preapproval(&self, subscription_id: &str) -> Result<WebhookOutcome, BillingError> {
        let remote = self.provider.get_subscription(subscription_id).await?;

        let mut client = self
            .clients
            .find_by_subscription_id(subscription_id)
            .await?
            .ok_or_else(|| BillingError::subscription_not_found(subscription_id))?;

        if !client.apply_provider_status(remote.status, Timestamp::now()) {
            return Ok(WebhookOutcome::ClientStatusUnchanged {
                client_id: client.id,
            });
        }

        self.clients.update(&client).await?;
        Ok(WebhookOutcome::ClientStatusChanged {
            client_id: client.id,
            status: client.status,
        })
    }

    /// Approved provider charges settle the period from the time of receipt.
    async fn settle(&self, client: &mut Client, now: Timestamp) -> Result<(), BillingError> {
        client.record_payment(now, now.add_months(1), now);
        self.clients.update(client).await?;
        Ok(())
    }
}

fn mirror(remote: &ProviderPayment, client: &Client, now: Timestamp) -> NewPayment {
    NewPayment {
        client_id: client.id,
        amount: remote.amount,
        paid_at: now,
        external_transaction_id: remote.id.clone(),
        method: format!("MercadoPago - {}", remote.method_id),
        description: Some(format!("Recurring payment - {}", client.program)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        client_with_status, pending_payment, subscribed_client, Fixture, BASIC_CENTS,
    };
    use crate::domain::billing::{BillingStatus, ProviderSubscriptionStatus};
    use crate::domain::foundation::Money;
    use crate::ports::PaymentError;

    fn handler(fx: &Fixture) -> HandleProviderWebhookHandler {
        HandleProviderWebhookHandler::new(
            fx.clients.clone(),
            fx.payments.clone(),
            fx.provider.clone(),
        )
    }

    fn event(event_type: &str, data_id: &str) -> HandleProviderWebhookCommand {
        HandleProviderWebhookCommand {
            event_type: event_type.to_string(),
            data_id: data_id.to_string(),
        }
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Payment events
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn approved_payment_is_recorded_and_settles_client() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "approved");

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        let payment_id = match outcome {
            WebhookOutcome::PaymentRecorded {
                payment_id,
                approved: true,
            } => payment_id,
            other => panic!("unexpected outcome {:?}", other),
        };
        let payment = fx.payments.find_by_id(payment_id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Approved);
        assert_eq!(payment.external_transaction_id, "9001");
        assert_eq!(payment.method, "MercadoPago - visa");
        assert_eq!(
            payment.description.as_deref(),
            Some("Recurring payment - OdontoCare")
        );

        let stored = fx.client(client.id).await;
        assert_eq!(stored.billing_status, BillingStatus::Paid);
        assert_eq!(stored.last_payment_at, Some(payment.paid_at));
        assert_eq!(stored.next_payment_due, Some(payment.paid_at.add_months(1)));
    }

    #[tokio::test]
    async fn unapproved_payment_is_recorded_pending() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "in_process");

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        assert!(matches!(
            outcome,
            WebhookOutcome::PaymentRecorded { approved: false, .. }
        ));
        assert_eq!(fx.client(client.id).await.billing_status, BillingStatus::Pending);
    }

    #[tokio::test]
    async fn redelivery_is_acknowledged_without_duplicate() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "approved");
        handler(&fx).handle(event("payment", "9001")).await.unwrap();

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        assert!(matches!(outcome, WebhookOutcome::PaymentAlreadyRecorded { .. }));
        assert_eq!(fx.payments.len().await, 1);
    }

    #[tokio::test]
    async fn pending_payment_is_promoted_when_provider_approves() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "pending");
        handler(&fx).handle(event("payment", "9001")).await.unwrap();
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "approved");

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        assert!(matches!(
            outcome,
            WebhookOutcome::PaymentRecorded { approved: true, .. }
        ));
        assert_eq!(fx.payments.len().await, 1);
        assert_eq!(fx.client(client.id).await.billing_status, BillingStatus::Paid);
    }

    #[tokio::test]
    async fn rejected_payment_is_promoted_when_provider_approves() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let mut stored = pending_payment(client.id, Timestamp::now().minus_days(1), "9001");
        stored.set_status(PaymentStatus::Rejected, Timestamp::now());
        fx.insert_payment(&stored).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "approved");

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::PaymentRecorded {
                payment_id: stored.id,
                approved: true,
            }
        );
        let payment = fx.payments.find_by_id(stored.id).await.unwrap().unwrap();
        assert_eq!(payment.status, PaymentStatus::Approved);
        assert_eq!(fx.payments.len().await, 1);
        let settled = fx.client(client.id).await;
        assert_eq!(settled.billing_status, BillingStatus::Paid);
        assert!(settled.next_payment_due.is_some());
    }

    #[tokio::test]
    async fn refunded_payment_stays_when_provider_still_refunded() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let mut stored = pending_payment(client.id, Timestamp::now().minus_days(1), "9001");
        stored.set_status(PaymentStatus::Refunded, Timestamp::now());
        fx.insert_payment(&stored).await;
        fx.provider
            .add_recurring_payment("9001", "pre_1", Money::from_cents(BASIC_CENTS), "refunded");

        let outcome = handler(&fx).handle(event("payment", "9001")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::PaymentAlreadyRecorded {
                payment_id: stored.id
            }
        );
        assert_eq!(fx.client(client.id).await.billing_status, BillingStatus::Pending);
    }

    #[tokio::test]
    async fn payment_for_unknown_subscription_is_not_found() {
        let fx = Fixture::new();
        fx.provider
            .add_recurring_payment("9001", "pre_unknown", Money::from_cents(BASIC_CENTS), "approved");

        let result = handler(&fx).handle(event("payment", "9001")).await;

        assert!(matches!(result, Err(BillingError::NotFound { .. })));
        assert!(fx.payments.is_empty().await);
    }

    #[tokio::test]
    async fn provider_failure_is_external_error() {
        let fx = Fixture::new();
        fx.provider
            .set_method_error("get_payment", PaymentError::network("down"));

        let result = handler(&fx).handle(event("payment", "9001")).await;

        assert!(matches!(result, Err(BillingError::ExternalProvider(_))));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Preapproval events
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn cancelled_agreement_deactivates_client_from_any_state() {
        for prior in [ClientStatus::Active, ClientStatus::Suspended] {
            let fx = Fixture::new();
            let client = client_with_status("a@clinic.com", "pre_1", prior);
            fx.insert_client(&client).await;
            fx.provider.add_subscription(
                "pre_1",
                ProviderSubscriptionStatus::Cancelled,
                Money::from_cents(BASIC_CENTS),
            );

            let outcome = handler(&fx).handle(event("preapproval", "pre_1")).await.unwrap();

            assert_eq!(
                outcome,
                WebhookOutcome::ClientStatusChanged {
                    client_id: client.id,
                    status: ClientStatus::Inactive,
                }
            );
            assert_eq!(fx.client(client.id).await.status, ClientStatus::Inactive);
        }
    }

    #[tokio::test]
    async fn paused_agreement_suspends_client() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider.add_subscription(
            "pre_1",
            ProviderSubscriptionStatus::Paused,
            Money::from_cents(BASIC_CENTS),
        );

        handler(&fx).handle(event("preapproval", "pre_1")).await.unwrap();

        assert_eq!(fx.client(client.id).await.status, ClientStatus::Suspended);
    }

    #[tokio::test]
    async fn pending_agreement_leaves_client_unchanged() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider.add_subscription(
            "pre_1",
            ProviderSubscriptionStatus::Pending,
            Money::from_cents(BASIC_CENTS),
        );

        let outcome = handler(&fx).handle(event("preapproval", "pre_1")).await.unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::ClientStatusUnchanged {
                client_id: client.id
            }
        );
        assert_eq!(fx.client(client.id).await, client);
    }

    #[tokio::test]
    async fn preapproval_for_unknown_client_is_not_found() {
        let fx = Fixture::new();
        fx.provider.add_subscription(
            "pre_orphan",
            ProviderSubscriptionStatus::Authorized,
            Money::from_cents(BASIC_CENTS),
        );

        let result = handler(&fx).handle(event("preapproval", "pre_orphan")).await;

        assert!(matches!(result, Err(BillingError::NotFound { .. })));
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Other events
    // ════════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn unknown_event_is_ignored() {
        let fx = Fixture::new();

        let outcome = handler(&fx)
            .handle(event("plan_updated", "123"))
            .await
            .unwrap();

        assert_eq!(
            outcome,
            WebhookOutcome::Ignored {
                event_type: "plan_updated".to_string()
            }
        );
        assert!(fx.provider.calls().is_empty());
    }

    #[tokio::test]
    async fn tracked_event_without_id_is_invalid() {
        let fx = Fixture::new();

        let result = handler(&fx).handle(event("payment", " ")).await;

        assert!(matches!(result, Err(BillingError::InvalidArgument { .. })));
        assert!(fx.provider.calls().is_empty());
    }
}
