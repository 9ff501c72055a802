//! UpdateAvailablePlansHandler - replaces a client's plan catalog.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client, Plan};
use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::ClientRepository;

/// Command to replace a client's plan catalog.
#[derive(Debug, Clone)]
pub struct UpdateAvailablePlansCommand {
    pub client_id: ClientId,
    pub available_plans: Vec<Plan>,
}

/// Handler for updating which plans a client may subscribe to.
pub struct UpdateAvailablePlansHandler {
    clients: Arc<dyn ClientRepository>,
}

impl UpdateAvailablePlansHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub async fn handle(&self, cmd: UpdateAvailablePlansCommand) -> Result<Client, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        client.replace_available_plans(cmd.available_plans, Timestamp::now())?;
        self.clients.update(&client).await?;

        Ok(client)
    }
}
