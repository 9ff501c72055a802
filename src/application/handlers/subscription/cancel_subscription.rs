//! CancelSubscriptionHandler - cancels the provider agreement.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client};
use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::{
    ClientRepository, PaymentProvider, SubscriptionStatusChange, SubscriptionUpdate,
};

/// Command to cancel a client's subscription.
#[derive(Debug, Clone, Copy)]
pub struct CancelSubscriptionCommand {
    pub client_id: ClientId,
}

/// Handler for cancelling subscriptions.
///
/// The provider agreement is cancelled first. The client is marked
/// inactive only after the provider confirms.
pub struct CancelSubscriptionHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
}

impl CancelSubscriptionHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, provider: Arc<dyn PaymentProvider>) -> Self {
        Self { clients, provider }
    }

    pub async fn handle(&self, cmd: CancelSubscriptionCommand) -> Result<Client, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        let subscription_id = client.require_subscription()?.to_string();

        self.provider
            .update_subscription(
                &subscription_id,
                SubscriptionUpdate::status(SubscriptionStatusChange::Cancelled),
            )
            .await?;

        client.mark_cancelled(Timestamp::now());
        self.clients.update(&client).await?;

        tracing::info!(
            client_id = %client.id,
            subscription_id = %subscription_id,
            "Subscription cancelled"
        );
        Ok(client)
    }
}
