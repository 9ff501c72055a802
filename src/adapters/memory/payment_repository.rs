use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::billing::Payment;
use crate::domain::foundation::{ClientId, DomainError, ErrorCode, PaymentId};
use crate::ports::{PaymentFilter, PaymentRepository};

#[derive(Default)]
pub struct InMemoryPaymentRepository {
    payments: RwLock<Vec<Payment>>,
}

impl InMemoryPaymentRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_payments(payments: Vec<Payment>) -> Self {
        Self {
            payments: RwLock::new(payments),
        }
    }

    /// Number of stored payments.
    pub async fn len(&self) -> usize {
        self.payments.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.payments.read().await.is_empty()
    }
}

#[async_trait]
impl PaymentRepository for InMemoryPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        self.payments.write().await.push(payment.clone());
        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let mut payments = self.payments.write().await;
        let slot = payments
            .iter_mut()
            .find(|p| p.id == payment.id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                    .with_detail("id", payment.id.to_string())
            })?;
        *slot = payment.clone();
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        Ok(self.payments.read().await.iter().find(|p| p.id == id).cloned())
    }

    async fn find_by_external_transaction_id(
        &self,
        external_transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .find(|p| p.external_transaction_id == external_transaction_id)
            .cloned())
    }

    async fn list(&self, filter: PaymentFilter) -> Result<Vec<Payment>, DomainError> {
        let mut matching: Vec<Payment> = self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| filter.matches(p))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.paid_at.cmp(&a.paid_at));
        Ok(matching)
    }

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError> {
        Ok(self
            .payments
            .read()
            .await
            .iter()
            .filter(|p| p.client_id == client_id)
            .count() as u64)
    }
}
