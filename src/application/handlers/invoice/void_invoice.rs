//! VoidInvoiceHandler - voids an issued invoice.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Invoice};
use crate::domain::foundation::{InvoiceId, Timestamp};
use crate::ports::InvoiceRepository;

/// Command to void an invoice.
#[derive(Debug, Clone, Copy)]
pub struct VoidInvoiceCommand {
    pub invoice_id: InvoiceId,
}

/// Handler for voiding invoices. Voiding is final.
pub struct VoidInvoiceHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl VoidInvoiceHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    pub async fn handle(&self, cmd: VoidInvoiceCommand) -> Result<Invoice, BillingError> {
        let mut invoice = self
            .invoices
            .find_by_id(cmd.invoice_id)
            .await?
            .ok_or_else(|| BillingError::invoice_not_found(cmd.invoice_id))?;

        invoice.void(Timestamp::now())?;
        self.invoices.update(&invoice).await?;

        tracing::info!(invoice_id = %invoice.id, number = %invoice.number, "Invoice voided");
        Ok(invoice)
    }
}
