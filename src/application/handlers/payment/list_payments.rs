//! ListPaymentsHandler - read projections over payments.

use std::sync::Arc;

use crate::domain::billing::{BillingError, Payment};
use crate::domain::foundation::ClientId;
use crate::ports::{PaymentFilter, PaymentRepository};

/// Query for payment history.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListPaymentsQuery {
    pub filter: PaymentFilter,
}

impl ListPaymentsQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn for_client(client_id: ClientId) -> Self {
        Self {
            filter: PaymentFilter::for_client(client_id),
        }
    }

    pub fn filtered(filter: PaymentFilter) -> Self {
        Self { filter }
    }
}

/// Handler for listing payments, newest first.
pub struct ListPaymentsHandler {
    payments: Arc<dyn PaymentRepository>,
}

impl ListPaymentsHandler {
    pub fn new(payments: Arc<dyn PaymentRepository>) -> Self {
        Self { payments }
    }

    /// Newest first.
    pub async fn handle(&self, query: ListPaymentsQuery) -> Result<Vec<Payment>, BillingError> {
        if let (Some(from), Some(to)) = (query.filter.from, query.filter.to) {
            if from.is_after(&to) {
                return Err(BillingError::invalid_argument(
                    "from",
                    "start of the range is after its end",
                ));
            }
        }
        Ok(self.payments.list(query.filter).await?)
    }
}
