//! Payment repository port.

use async_trait::async_trait;

use crate::domain::billing::{Payment, PaymentStatus};
use crate::domain::foundation::{ClientId, DomainError, PaymentId, Timestamp};

/// Listing filter. Set fields are AND-combined and date bounds are inclusive.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PaymentFilter {
    pub client_id: Option<ClientId>,
    pub from: Option<Timestamp>,
    pub to: Option<Timestamp>,
    pub status: Option<PaymentStatus>,
}

impl PaymentFilter {
    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            client_id: Some(client_id),
            ..Default::default()
        }
    }

    /// True when the payment passes every set criterion.
    pub fn matches(&self, payment: &Payment) -> bool {
        self.client_id.map_or(true, |id| payment.client_id == id)
            && self.from.map_or(true, |from| payment.paid_at >= from)
            && self.to.map_or(true, |to| payment.paid_at <= to)
            && self.status.map_or(true, |status| payment.status == status)
    }
}

#[async_trait]
pub trait PaymentRepository: Send + Sync {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError>;

    /// # Errors
    ///
    /// - `PaymentNotFound` if the payment does not exist
    async fn update(&self, payment: &Payment) -> Result<(), DomainError>;

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError>;

    /// Lookup used to recognise provider redeliveries.
    async fn find_by_external_transaction_id(
        &self,
        external_transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError>;

    /// Matching payments, most recent payment date first.
    async fn list(&self, filter: PaymentFilter) -> Result<Vec<Payment>, DomainError>;

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError>;
}
