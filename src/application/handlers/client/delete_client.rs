//! DeleteClientHandler - removes a client with no billing history.

use std::sync::Arc;

use crate::domain::billing::BillingError;
use crate::domain::foundation::ClientId;
use crate::ports::{ClientRepository, InvoiceRepository, PaymentRepository};

/// Command to delete a client.
#[derive(Debug, Clone, Copy)]
pub struct DeleteClientCommand {
    pub client_id: ClientId,
}

/// Handler for deleting clients.
///
/// Clients with payments or invoices on record are kept for history.
pub struct DeleteClientHandler {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl DeleteClientHandler {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        payments: Arc<dyn PaymentRepository>,
        invoices: Arc<dyn InvoiceRepository>,
    ) -> Self {
        Self {
            clients,
            payments,
            invoices,
        }
    }

    pub async fn handle(&self, cmd: DeleteClientCommand) -> Result<(), BillingError> {
        if self.clients.find_by_id(cmd.client_id).await?.is_none() {
            return Err(BillingError::client_not_found(cmd.client_id));
        }

        let payments = self.payments.count_for_client(cmd.client_id).await?;
        let invoices = self.invoices.count_for_client(cmd.client_id).await?;
        if payments > 0 || invoices > 0 {
            return Err(BillingError::invalid_state(format!(
                "client has {} payments and {} invoices on record",
                payments, invoices
            )));
        }

        self.clients.delete(cmd.client_id).await?;
        tracing::info!(client_id = %cmd.client_id, "Client deleted");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{approved_payment, new_client, Fixture};
    use crate::domain::foundation::Timestamp;

    fn handler(fx: &Fixture) -> DeleteClientHandler {
        DeleteClientHandler::new(fx.clients.clone(), fx.payments.clone(), fx.invoices.clone())
    }

    #[tokio::test]
    async fn deletes_client_without_history() {
        let fx = Fixture::new();
        let client = new_client("a@clinic.com");
        fx.insert_client(&client).await;

        handler(&fx)
            .handle(DeleteClientCommand { client_id: client.id })
            .await
            .unwrap();

        assert!(fx.clients.find_by_id(client.id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn refuses_client_with_payments() {
        let fx = Fixture::new();
        let client = new_client("a@clinic.com");
        fx.insert_client(&client).await;
        fx.insert_payment(&approved_payment(client.id, Timestamp::now(), "TX-1"))
            .await;

        let result = handler(&fx)
            .handle(DeleteClientCommand { client_id: client.id })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
    }

    #[tokio::test]
    async fn fails_when_client_missing() {
        let fx = Fixture::new();
        let result = handler(&fx)
            .handle(DeleteClientCommand {
                client_id: ClientId::new(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::NotFound { .. })));
    }
}
