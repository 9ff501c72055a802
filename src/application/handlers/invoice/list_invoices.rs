//! ListInvoicesHandler - read projections over invoices, newest first.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Invoice};
use crate::domain::foundation::ClientId;
use crate::ports::{InvoiceFilter, InvoiceRepository};

/// Query for invoices matching a filter.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListInvoicesQuery {
    pub filter: InvoiceFilter,
}

impl ListInvoicesQuery {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            filter: InvoiceFilter::for_client(client_id),
        }
    }

    pub fn filtered(filter: InvoiceFilter) -> Self {
        Self { filter }
    }
}

/// Handler for listing invoices.
pub struct ListInvoicesHandler {
    invoices: Arc<dyn InvoiceRepository>,
}

impl ListInvoicesHandler {
    pub fn new(invoices: Arc<dyn InvoiceRepository>) -> Self {
        Self { invoices }
    }

    pub async fn handle(&self, query: ListInvoicesQuery) -> Result<Vec<Invoice>, BillingError> {
        if let (Some(from), Some(to)) = (query.filter.from, query.filter.to) {
            if from.is_after(&to) {
                return Err(BillingError::invalid_argument(
                    "from",
                    "start of the range is after its end",
                ));
            }
        }
        Ok(self.invoices.list(query.filter).await?)
    }
}
