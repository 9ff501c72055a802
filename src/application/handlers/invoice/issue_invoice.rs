//! IssueInvoiceHandler - invoices an approved payment.
//!
//! The number is the latest stored number plus one. Two concurrent issues can
//! read the same latest invoice; the store's unique index on `number` makes
//! the loser fail instead of producing a duplicate.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Invoice, InvoiceNumber};
use crate::domain::foundation::{PaymentId, Timestamp};
use crate::ports::{ClientRepository, InvoiceRepository, PaymentRepository};

/// Command to invoice an approved payment.
#[derive(Debug, Clone, Copy)]
pub struct IssueInvoiceCommand {
    pub payment_id: PaymentId,
}

/// Handler for issuing invoices. A payment is invoiced at most once.
pub struct IssueInvoiceHandler {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

impl IssueInvoiceHandler {
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

    pub async fn handle(&self, cmd: IssueInvoiceCommand) -> Result<Invoice, BillingError> {
        let mut payment = self
            .payments
            .find_by_id(cmd.payment_id)
            .await?
            .ok_or_else(|| BillingError::payment_not_found(cmd.payment_id))?;

        payment.ensure_invoiceable()?;

        let client = self
            .clients
            .find_by_id(payment.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(payment.client_id))?;

        let latest = self.invoices.find_latest().await?;
        let number = InvoiceNumber::next_after(latest.as_ref().map(|invoice| &invoice.number));

        let now = Timestamp::now();
        let invoice = Invoice::issue_for(&payment, &client, number, now)?;
        payment.mark_invoiced(now)?;

        self.invoices.save(&invoice).await?;
        self.payments.update(&payment).await?;

        tracing::info!(
            invoice_id = %invoice.id,
            number = %invoice.number,
            payment_id = %payment.id,
            "Invoice issued"
        );
        Ok(invoice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::test_support::{
        approved_payment, pending_payment, subscribed_client, Fixture,
    };
    use crate::domain::foundation::ClientId;

    fn handler(fx: &Fixture) -> IssueInvoiceHandler {
        IssueInvoiceHandler::new(fx.clients.clone(), fx.payments.clone(), fx.invoices.clone())
    }

    #[tokio::test]
    async fn issues_first_invoice_and_flags_payment() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let payment = approved_payment(client.id, Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;

        let invoice = handler(&fx)
            .handle(IssueInvoiceCommand { payment_id: payment.id })
            .await
            .unwrap();

        assert_eq!(invoice.number.to_string(), "FACT-000001");
        assert_eq!(invoice.total, payment.amount);
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(invoice.line_items[0].description, "Monthly subscription - OdontoCare");
        assert!(fx.payments.find_by_id(payment.id).await.unwrap().unwrap().invoice_generated);
    }

    #[tokio::test]
    async fn numbers_follow_latest_invoice() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;

        let mut numbers = Vec::new();
        for tx in ["TRX-1", "TRX-2", "TRX-3", "TRX-4"] {
            let payment = approved_payment(client.id, Timestamp::now(), tx);
            fx.insert_payment(&payment).await;
            let invoice = handler(&fx)
                .handle(IssueInvoiceCommand { payment_id: payment.id })
                .await
                .unwrap();
            numbers.push(invoice.number.to_string());
        }

        assert_eq!(numbers[2], "FACT-000003");
        assert_eq!(numbers[3], "FACT-000004");
    }

    #[tokio::test]
    async fn second_issue_for_same_payment_fails() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let payment = approved_payment(client.id, Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;
        handler(&fx)
            .handle(IssueInvoiceCommand { payment_id: payment.id })
            .await
            .unwrap();

        let result = handler(&fx)
            .handle(IssueInvoiceCommand { payment_id: payment.id })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
        assert_eq!(fx.invoices.len().await, 1);
    }

    #[tokio::test]
    async fn refuses_unapproved_payment() {
        let fx = Fixture::new();
        let client = subscribed_client("a@clinic.com", "pre_1");
        fx.insert_client(&client).await;
        let payment = pending_payment(client.id, Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;

        let result = handler(&fx)
            .handle(IssueInvoiceCommand { payment_id: payment.id })
            .await;

        assert!(matches!(result, Err(BillingError::InvalidState(_))));
        assert!(fx.invoices.is_empty().await);
    }

    #[tokio::test]
    async fn fails_when_payment_missing() {
        let fx = Fixture::new();
        let result = handler(&fx)
            .handle(IssueInvoiceCommand {
                payment_id: PaymentId::new(),
            })
            .await;
        assert!(matches!(result, Err(BillingError::NotFound { .. })));
    }

    #[tokio::test]
    async fn fails_when_client_missing() {
        let fx = Fixture::new();
        let payment = approved_payment(ClientId::new(), Timestamp::now(), "TRX-1");
        fx.insert_payment(&payment).await;

        let result = handler(&fx)
            .handle(IssueInvoiceCommand { payment_id: payment.id })
            .await;

        assert!(matches!(result, Err(BillingError::NotFound { .. })));
        assert!(!fx.payments.find_by_id(payment.id).await.unwrap().unwrap().invoice_generated);
    }
}
