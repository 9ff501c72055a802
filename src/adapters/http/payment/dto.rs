//! Request and response DTOs for payment endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::domain::billing::{Payment, PaymentStatus};

#[derive(Debug, Clone, Deserialize)]
pub struct RegisterPaymentRequest {
    pub client_id: Uuid,
    /// Major units.
    pub amount: f64,
    pub method: String,
    #[serde(default)]
    pub description: Option<String>,
    pub external_transaction_id: String,
}

/// The status stays a string so an unknown value surfaces as a 400 from
/// the handler rather than a body rejection.
#[derive(Debug, Clone, Deserialize)]
pub struct SetPaymentStatusRequest {
    pub status: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentResponse {
    pub id: String,
    pub client_id: String,
    pub amount: f64,
    pub paid_at: DateTime<Utc>,
    pub status: PaymentStatus,
    pub external_transaction_id: String,
    pub method: String,
    pub description: Option<String>,
    pub invoice_generated: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Payment> for PaymentResponse {
    fn from(payment: Payment) -> Self {
        Self {
            id: payment.id.to_string(),
            client_id: payment.client_id.to_string(),
            amount: payment.amount.as_major(),
            paid_at: *payment.paid_at.as_datetime(),
            status: payment.status,
            external_transaction_id: payment.external_transaction_id,
            method: payment.method,
            description: payment.description,
            invoice_generated: payment.invoice_generated,
            created_at: *payment.created_at.as_datetime(),
            updated_at: *payment.updated_at.as_datetime(),
        }
    }
}
