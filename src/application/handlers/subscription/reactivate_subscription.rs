//! ReactivateSubscriptionHandler - resumes a suspended client's agreement.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client};
use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::{
    ClientRepository, PaymentProvider, SubscriptionStatusChange, SubscriptionUpdate,
};

/// Command to reactivate a suspended client.
#[derive(Debug, Clone, Copy)]
pub struct ReactivateSubscriptionCommand {
    pub client_id: ClientId,
}

/// Handler for reactivating subscriptions.
pub struct ReactivateSubscriptionHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl ReactivateSubscriptionHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { clients, provider }
    }

    pub async fn handle(&self, cmd: ReactivateSubscriptionCommand) -> Result<Client, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        // Validate locally before touching the provider.
        client.reactivate(Timestamp::now())?;
        let subscription_id = client.require_subscription()?.to_string();

        self.provider
            .update_subscription(
                &subscription_id,
                SubscriptionUpdate::status(SubscriptionStatusChange::Authorized),
            )
            .await?;

        self.clients.update(&client).await?;

        tracing::info!(
            client_id = %client.id,
            subscription_id = %subscription_id,
            "Subscription reactivated"
        );
        Ok(client)
    }
}
