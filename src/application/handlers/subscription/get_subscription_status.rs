//! GetSubscriptionStatusHandler - local billing fields merged with the
//! provider's live view of the agreement.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::billing::{
    BillingError, BillingStatus, ClientStatus, CurrentPlan, ProviderSubscriptionStatus,
};
use crate::domain::foundation::{ClientId, Money, Timestamp};
use crate::ports::{ClientRepository, PaymentProvider};

/// Query for a client's subscription status.
#[derive(Debug, Clone, Copy)]
pub struct GetSubscriptionStatusQuery {
    pub client_id: ClientId,
}

/// Local subscription state alongside the provider's view.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SubscriptionStatusView {
    pub client_id: ClientId,
    pub client_status: ClientStatus,
    pub billing_status: BillingStatus,
    pub current_plan: Option<CurrentPlan>,
    pub next_payment_due: Option<Timestamp>,
    pub last_payment_at: Option<Timestamp>,
    pub subscription_id: String,
    pub provider_status: ProviderSubscriptionStatus,
    pub recurring_amount: Money,
    pub frequency: u32,
    pub frequency_unit: String,
}

/// Handler for subscription status lookups.
pub struct GetSubscriptionStatusHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl GetSubscriptionStatusHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { clients, provider }
    }

    pub async fn handle(
        &self,
        query: GetSubscriptionStatusQuery,
    ) -> Result<SubscriptionStatusView, BillingError> {
        let client = self
            .clients
            .find_by_id(query.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(query.client_id))?;

        let subscription_id = client.require_subscription()?;
        let remote = self.provider.get_subscription(subscription_id).await?;

        Ok(SubscriptionStatusView {
            client_id: client.id,
            client_status: client.status,
            billing_status: client.billing_status,
            current_plan: client.current_plan,
            next_payment_due: client.next_payment_due,
            last_payment_at: client.last_payment_at,
            subscription_id: remote.id,
            provider_status: remote.status,
            recurring_amount: remote.recurring_amount,
            frequency: remote.frequency,
            frequency_unit: remote.frequency_unit,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{new_client, subscribed_client, Fixture};

    fn handler(fx: &Fixture) -> GetSubscriptionStatusHandler {
        GetSubscriptionStatusHandler::new(fx.clients.clone(), fx.provider.clone())
    }

    #[tokio::test]
    async fn merges_local_and_provider_fields() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider.add_subscription(
            "pre_1",
            ProviderSubscriptionStatus::Authorized,
            Money::from_cents(12_345),
        );

        let view = handler(&fx)
            .handle(GetSubscriptionStatusQuery { client_id: client.id })
            .await
            .unwrap();

        assert_eq!(view.subscription_id, "pre_1");
        assert_eq!(view.provider_status, ProviderSubscriptionStatus::Authorized);
        assert_eq!(view.recurring_amount, Money::from_cents(12_345));
        assert_eq!(view.client_status, ClientStatus::Active);
        assert_eq!(view.current_plan, client.current_plan);
    }

    #[tokio::test]
    async fn fails_without_subscription() {
        let fx = Fixture::new();
        let client = new_client("a@clinic.com");
        fx.insert_client(&client).await;

        let result = handler(&fx)
            .handle(GetSubscriptionStatusQuery { client_id: client.id })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn surfaces_provider_not_found_as_external_error() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_gone");
        fx.insert_client(&client).await;

        let result = handler(&fx)
            .handle(GetSubscriptionStatusQuery { client_id: client.id })
            .await;

        assert!(matches!(result, Err(BillingError::ExternalProvider(_))));
    }
}
