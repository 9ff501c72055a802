//! UpdateSubscriptionHandler - changes plan and/or recurring price.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client, PlanType};
use crate::domain::foundation::{ClientId, Money, Timestamp};
use crate::ports::{ClientRepository, PaymentProvider, SubscriptionUpdate};

/// Command to change a client's plan or price.
///
/// At least one of `plan_type` and `price` must be given.
#[derive(Debug, Clone)]
pub struct UpdateSubscriptionCommand {
    pub client_id: ClientId,
    pub plan_type: Option<PlanType>,
    pub price: Option<Money>,
}

/// Handler for plan and price changes.
///
/// The new amount is pushed to the provider agreement before the
/// client record changes.
pub struct UpdateSubscriptionHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl UpdateSubscriptionHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { clients, provider }
    }

    pub async fn handle(&self, cmd: UpdateSubscriptionCommand) -> Result<Client, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        let subscription_id = client.require_subscription()?.to_string();
        let now = Timestamp::now();

        let price = match (cmd.plan_type, cmd.price) {
            (Some(plan_type), price) => client.switch_plan(plan_type, price, now)?,
            (None, Some(price)) => client.reprice_current_plan(price, now)?,
            (None, None) => {
                return Err(BillingError::invalid_argument(
                    "plan_type",
                    "either a new plan or a new price is required",
                ))
            }
        };

        self.provider
            .update_subscription(&subscription_id, SubscriptionUpdate::amount(price))
            .await?;

        self.clients.update(&client).await?;

        tracing::info!(
            client_id = %client.id,
            subscription_id = %subscription_id,
            amount = %price,
            "Subscription updated"
        );
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        new_client, subscribed_client, Fixture, BASIC_CENTS, PRO_CENTS,
    };
    use crate::domain::billing::ProviderSubscriptionStatus;
    use crate::ports::PaymentError;

    fn handler(fx: &Fixture) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(fx.clients.clone(), fx.provider.clone())
    }

    async fn seeded(fx: &Fixture) -> Client {
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        fx.provider.add_subscription(
            "pre_1",
            ProviderSubscriptionStatus::Authorized,
            Money::from_cents(BASIC_CENTS),
        );
        client
    }

    #[tokio::test]
    async fn switches_plan_at_listed_price() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;

        handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: Some(PlanType::Pro),
                price: None,
            })
            .await
            .unwrap();

        let current = fx.client(client.id).await.current_plan.unwrap();
        assert_eq!(current.plan_type, PlanType::Pro);
        assert_eq!(current.price, Money::from_cents(PRO_CENTS));
        assert_eq!(
            fx.provider.subscription("pre_1").unwrap().recurring_amount,
            Money::from_cents(PRO_CENTS)
        );
    }

    #[tokio::test]
    async fn switches_plan_at_negotiated_price() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;

        handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: Some(PlanType::Pro),
                price: Some(Money::from_cents(25_000)),
            })
            .await
            .unwrap();

        let current = fx.client(client.id).await.current_plan.unwrap();
        assert_eq!(current.price, Money::from_cents(25_000));
    }

    #[tokio::test]
    async fn reprices_in_place_keeping_activation_date() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;
        let before = client.current_plan.clone().unwrap();

        handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: None,
                price: Some(Money::from_cents(12_000)),
            })
            .await
            .unwrap();

        let current = fx.client(client.id).await.current_plan.unwrap();
        assert_eq!(current.plan_type, before.plan_type);
        assert_eq!(current.activated_at, before.activated_at);
        assert_eq!(current.price, Money::from_cents(12_000));
    }

    #[tokio::test]
    async fn requires_plan_or_price() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;

        let result = handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: None,
                price: None,
            })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn rejects_zero_price() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;

        let result = handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: None,
                price: Some(Money::zero()),
            })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn fails_without_subscription() {
        let fx = Fixture::new();
        let client = new_client("a@clinic.com");
        fx.insert_client(&client).await;

        let result = handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: Some(PlanType::Pro),
                price: None,
            })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn provider_failure_keeps_previous_plan() {
        let fx = Fixture::new();
        let client = seeded(&fx).await;
        fx.provider
            .set_method_error("update_subscription", PaymentError::network("reset"));

        let result = handler(&fx)
            .handle(UpdateSubscriptionCommand {
                client_id: client.id,
                plan_type: Some(PlanType::Pro),
                price: None,
            })
            .await;

        assert!(matches!(result, Err(BillingError::ExternalProvider(_))));
        assert_eq!(fx.client(client.id).await.current_plan, client.current_plan);
    }
}
