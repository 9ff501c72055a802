//! CreateClientHandler - registers a client and its plan catalog.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Client, NewClient, Plan, Program};
use crate::domain::foundation::Timestamp;
use crate::ports::ClientRepository;

/// Command to register a new client with its plan catalog.
#[derive(Debug, Clone)]
pub struct CreateClientCommand {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub program: Program,
    pub available_plans: Vec<Plan>,
}

/// Handler for registering clients.
///
/// Emails are unique across clients. New clients start inactive until
/// they subscribe.
pub struct CreateClientHandler {
    clients: Arc<dyn ClientRepository>,
}

impl CreateClientHandler {
    pub fn new(clients: Arc<dyn ClientRepository>) -> Self {
        Self { clients }
    }

    pub async fn handle(&self, cmd: CreateClientCommand) -> Result<Client, BillingError> {
        let client = Client::create(
            NewClient {
                name: cmd.name,
                email: cmd.email,
                phone: cmd.phone,
                program: cmd.program,
                available_plans: cmd.available_plans,
            },
            Timestamp::now(),
        )?;

        if self.clients.find_by_email(&client.email).await?.is_some() {
            return Err(BillingError::invalid_state(format!(
                "a client with email {} already exists",
                client.email
            )));
        }

        self.clients.save(&client).await?;

        tracing::info!(client_id = %client.id, program = %client.program, "Client created");
        Ok(client)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{catalog, Fixture};
    use crate::domain::billing::ClientStatus;

    fn command(email: &str) -> CreateClientCommand {
        CreateClientCommand {
            name: "Ortodoncia Centro".to_string(),
            email: email.to_string(),
            phone: "555-0101".to_string(),
            program: Program::OdontoCare,
            available_plans: catalog(),
        }
    }

    #[tokio::test]
    async fn creates_inactive_client() {
        let fx = Fixture::new();
        let handler = CreateClientHandler::new(fx.clients.clone());

        let client = handler.handle(command("ortho@centro.com")).await.unwrap();

        assert_eq!(client.status, ClientStatus::Inactive);
        assert_eq!(fx.client(client.id).await, client);
    }

    #[tokio::test]
    async fn fails_without_plans() {
        let fx = Fixture::new();
        let handler = CreateClientHandler::new(fx.clients.clone());
        let mut cmd = command("ortho@centro.com");
        cmd.available_plans.clear();

        let result = handler.handle(cmd).await;

        assert!(matches!(result, Err(BillingError::InvalidArgument { .. })));
    }

    #[tokio::test]
    async fn fails_on_duplicate_email() {
        let fx = Fixture::new();
        let handler = CreateClientHandler::new(fx.clients.clone());
        handler.handle(command("ortho@centro.com")).await.unwrap();

        let result = handler.handle(command("ORTHO@centro.com")).await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
    }
}
