use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::billing::Invoice;
use crate::domain::foundation::{ClientId, DomainError, ErrorCode, InvoiceId};
use crate::ports::{InvoiceFilter, InvoiceRepository};

/// Invoices kept in creation order, so the last entry is the latest.
#[derive(Default)]
pub struct InMemoryInvoiceRepository {
    invoices: RwLock<Vec<Invoice>>,
}

impl InMemoryInvoiceRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_invoices(invoices: Vec<Invoice>) -> Self {
        Self {
            invoices: RwLock::new(invoices),
        }
    }

    pub async fn len(&self) -> usize {
        self.invoices.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.invoices.read().await.is_empty()
    }
}

#[async_trait]
impl InvoiceRepository for InMemoryInvoiceRepository {
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut invoices = self.invoices.write().await;
        if invoices.iter().any(|i| i.number == invoice.number) {
            return Err(DomainError::new(
                ErrorCode::DuplicateRecord,
                format!("invoice number {} already exists", invoice.number),
            ));
        }
        if invoices.iter().any(|i| i.payment_id == invoice.payment_id) {
            return Err(DomainError::new(
                ErrorCode::DuplicateRecord,
                format!("payment {} already has an invoice", invoice.payment_id),
            ));
        }
        invoices.push(invoice.clone());
        Ok(())
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let mut invoices = self.invoices.write().await;
        let slot = invoices
            .iter_mut()
            .find(|i| i.id == invoice.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::InvoiceNotFound, "Invoice not found")
                    .with_detail("id", invoice.id.to_string())
            })?;
        *slot = invoice.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.iter().find(|i| i.id == id).cloned())
    }

    async fn find_latest(&self) -> Result<Option<Invoice>, DomainError> {
        Ok(self.invoices.read().await.last().cloned())
    }

    async fn list(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, DomainError> {
        let mut matching: Vec<Invoice> = self
            .invoices
            .read()
            .await
            .iter()
            .filter(|i| filter.matches(i))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.issued_at.cmp(&a.issued_at));
        Ok(matching)
    }

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError> {
        Ok(self
            .invoices
            .read()
            .await
            .iter()
            .filter(|i| i.client_id == client_id)
            .count() as u64)
    }
}
