//! UpdateClientHandler - edits contact fields.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client, ClientChanges};
use crate::domain::foundation::{ClientId, Timestamp};
use crate::ports::ClientRepository;

/// Command to edit a client's contact details.
#[derive(Debug, Clone)]
pub struct UpdateClientCommand {
    pub client_id: ClientId,
    pub changes: ClientChanges,
}

/// Handler for client profile updates.
pub struct UpdateClientHandler {
    clients: Arc<dyn ClientRepository>,
}

impl UpdateClientHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub async fn handle(&self, cmd: UpdateClientCommand) -> Result<Client, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        client.update_contact(cmd.changes, Timestamp::now())?;

        if let Some(other) = self.clients.find_by_email(&client.email).await? {
            if other.id != client.id {
                return Err(BillingError::invalid_state(format!(
                    "a client with email {} already exists",
                    client.email
                )));
            }
        }

        self.clients.update(&client).await?;
        Ok(client)
    }
}
