//! CreateSubscriptionHandler - opens a recurring agreement for a client.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::billing::{BillingError, Client, PlanType};
use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::{ClientRepository, CreateSubscriptionRequest, PaymentProvider};

/// Provider-facing settings for new agreements.
#[derive(Debug, Clone)]
pub struct SubscriptionSettings {
    /// ISO currency of the recurring charge.
    pub currency: String,
    /// Where the provider sends the payer after checkout.
    pub back_url: String,
}

impl Default for SubscriptionSettings {
    fn default() -> Self {
        Self {
            currency: "ARS".to_string(),
            back_url: "http://localhost:5000/subscription/result".to_string(),
        }
    }
}

/// Command to subscribe a client to one of its plans.
#[derive(Debug, Clone)]
pub struct CreateSubscriptionCommand {
    pub client_id: ClientId,
    pub plan_type: PlanType,
}

/// Result of a new subscription.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CreateSubscriptionResult {
    pub subscription_id: String,
    /// Checkout URL the payer must visit to authorize the agreement.
    pub init_point: String,
    pub client: Client,
}

/// Handler for creating subscriptions.
pub struct CreateSubscriptionHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
    settings: SubscriptionSettings,
}

impl CreateSubscriptionHandler {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        provider: Arc<dyn PaymentProvider>,
        settings: SubscriptionSettings,
    ) -> Self {
        Self {
            clients,
            provider,
            settings,
        }
    }

    pub async fn handle(
        &self,
        cmd: CreateSubscriptionCommand,
    ) -> Result<CreateSubscriptionResult, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        let plan = client.require_plan(cmd.plan_type)?.clone();

        let created = self
            .provider
            .create_subscription(CreateSubscriptionRequest {
                reason: format!(
                    "Subscription {} - {}",
                    plan.plan_type,
                    client.program.display_name()
                ),
                amount: plan.price,
                currency: self.settings.currency.clone(),
                frequency_months: 1,
                payer_email: client.email.clone(),
                back_url: self.settings.back_url.clone(),
            })
            .await?;

        client.subscribe(created.id.clone(), &plan, Timestamp::now());
        self.clients.update(&client).await?;

        tracing::info!(
            client_id = %client.id,
            subscription_id = %created.id,
            plan = %plan.plan_type,
            "Subscription created"
        );

        Ok(CreateSubscriptionResult {
            subscription_id: created.id,
            init_point: created.init_point,
            client,
        })
    }
}
