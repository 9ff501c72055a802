//! Invoice repository port.

use async_trait::async_trait;

use crate::domain::billing::{Invoice, InvoiceStatus};
use crate::domain::foundation::{ClientId, DomainError, InvoiceId, Timestamp};

/// Listing filter. Set fields are AND-combined and date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct InvoiceFilter {
    pub client_id: Option<ClientId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<InvoiceStatus>,
}

impl InvoiceFilter {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    pub fn matches(&self, invoice: &Invoice) -> bool {
        self.client_id.map_or(true, |id| invoice.client_id == id)
            && self.from.map_or(true, |from| invoice.issued_at >= from)
            && self.to.map_or(true, |to| invoice.issued_at <= to)
            && self.status.map_or(true, |status| invoice.status == status)
    }
}

#[async_trait]
pub trait InvoiceRepository: Send + Sync {
    /// Save a new invoice.
    ///
    /// # Errors
    ///
    /// - `DuplicateRecord` if the number or the payment is already invoiced
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `InvoiceNotFound` if the invoice does not exist
    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError>;

    /// Most recently created invoice, the base for the next number.
    async fn find_latest(&self) -> Result<Option<Invoice>, DomainError>;

    /// Matching invoices, most recent issue date first.
    async fn list(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, DomainError>;

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError>;
}
