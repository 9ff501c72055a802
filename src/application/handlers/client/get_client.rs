//! Client queries.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client};
use crate::domain::foundation::ClientId;
use crate::ports::ClientRepository;

/// Query for a single client.
#[derive(Debug, Clone, Copy)]
pub struct GetClientQuery {
    pub client_id: ClientId,
}

/// Handler for fetching one client by id.
pub struct GetClientHandler {
    clients: Arc<dyn ClientRepository>,
}

impl GetClientHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub async fn handle(&self, query: GetClientQuery) -> Result<Client, BillingError> {
        self.clients
            .find_by_id(query.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(query.client_id))
    }
}

/// Handler for listing every client.
pub struct ListClientsHandler {
    clients: Arc<dyn ClientRepository>,
}

impl ListClientsHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub async fn handle(&self) -> Result<Vec<Client>, BillingError> {
        Ok(self.clients.list_all().await?)
    }
}
