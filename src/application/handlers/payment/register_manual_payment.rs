//! RegisterManualPaymentHandler - records an operator-entered payment.
//!
//! Manual payments are trusted: they are stored approved and immediately
//! settle the client's current period, with the next due date anchored to
//! the time of registration.

use std::sync::Arc;

use crate::domain::billing::{BillingError, NewPayment, Payment};
use crate::domain::foundation::{ClientId, Money, Timestamp};
use crate::ports::{ClientRepository, PaymentRepository};

/// Command to record a payment made outside MercadoPago.
#[derive(Debug, Clone)]
pub struct RegisterManualPaymentCommand {
    pub client_id: ClientId,
    pub amount: Money,
    pub method: String,
    pub description: Option<String>,
    pub external_transaction_id: String,
}

/// Handler for manual payments.
///
/// Manual payments are approved on entry and settle the client.
pub struct RegisterManualPaymentHandler {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
}

impl RegisterManualPaymentHandler {
    pub fn new(clients: Arc<dyn ClientRepository>, payments: Arc<dyn PaymentRepository>) -> Self {
        Self { clients, payments }
    }

    pub async fn handle(&self, cmd: RegisterManualPaymentCommand) -> Result<Payment, BillingError> {
        let mut client = self
            .clients
            .find_by_id(cmd.client_id)
            .await?
            .ok_or_else(|| BillingError::client_not_found(cmd.client_id))?;

        let now = Timestamp::now();
        let payment = Payment::manual(
            NewPayment {
                client_id: client.id,
                amount: cmd.amount,
                paid_at: now,
                external_transaction_id: cmd.external_transaction_id,
                method: cmd.method,
                description: cmd.description,
            },
            now,
        )?;

        if self
            .payments
            .find_by_external_transaction_id(&payment.external_transaction_id)
            .await?
            .is_some()
        {
            return Err(BillingError::invalid_state(format!(
                "transaction {} is already recorded",
                payment.external_transaction_id
            )));
        }

        self.payments.save(&payment).await?;

        client.record_payment(now, now.add_months(1), now);
        self.clients.update(&client).await?;

        tracing::info!(
            payment_id = %payment.id,
            client_id = %client.id,
            amount = %payment.amount,
            "Manual payment registered"
        );
        Ok(payment)
    }
}
