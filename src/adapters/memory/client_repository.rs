use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::billing::Client;
use crate::domain::foundation::{ClientId, DomainError, ErrorCode, Timestamp};
use crate::ports::ClientRepository;

/// Clients kept in insertion order.
#[derive(Default)]
pub struct InMemoryClientRepository {
    clients: RwLock<Vec<Client>>,
}

impl InMemoryClientRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repository pre-populated with the given clients.
    pub fn with_clients(clients: Vec<Client>) -> Self {
        Self {
            clients: RwLock::new(clients),
        }
    }
}

fn not_found(id: ClientId) -> DomainError {
    DomainError::new(ErrorCode::ClientNotFound, "Client not found").with_detail("id", id.to_string())
}

fn email_taken(email: &str) -> DomainError {
    DomainError::new(
        ErrorCode::DuplicateRecord,
        format!("email {} is already registered", email),
    )
}

#[async_trait]
impl ClientRepository for InMemoryClientRepository {
    async fn save(&self, client: &Client) -> Result<(), DomainError> {
        let mut clients = self.clients.write().await;
        if clients.iter().any(|c| c.email == client.email) {
            return Err(email_taken(&client.email));
        }
        clients.push(client.clone());
        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), DomainError> {
        let mut clients = self.clients.write().await;
        if clients
            .iter()
            .any(|c| c.id != client.id && c.email == client.email)
        {
            return Err(email_taken(&client.email));
        }
        let slot = clients
            .iter_mut()
            .find(|c| c.id == client.id)
            .ok_or_else(|| not_found(client.id))?;
        *slot = client.clone();
        Ok(())
    }

    async fn delete(&self, id: ClientId) -> Result<(), DomainError> {
        let mut clients = self.clients.write().await;
        let pos = clients
            .iter()
            .position(|c| c.id == id)
            .ok_or_else(|| not_found(id))?;
        clients.remove(pos);
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, DomainError> {
        Ok(self.clients.read().await.iter().find(|c| c.id == id).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        let email = email.to_lowercase();
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .find(|c| c.email == email)
            .cloned())
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Client>, DomainError> {
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .find(|c| c.subscription_id.as_deref() == Some(subscription_id))
            .cloned())
    }

    async fn list_all(&self) -> Result<Vec<Client>, DomainError> {
        Ok(self.clients.read().await.clone())
    }

    async fn find_overdue_candidates(&self, as_of: Timestamp) -> Result<Vec<Client>, DomainError> {
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .filter(|c| c.is_overdue_candidate(&as_of))
            .cloned()
            .collect())
    }

    async fn find_due_within(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Client>, DomainError> {
        Ok(self
            .clients
            .read()
            .await
            .iter()
            .filter(|c| c.is_due_within(&from, &to))
            .cloned()
            .collect())
    }
}
