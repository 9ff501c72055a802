//! Payment records.
//!
//! A payment is either registered by an operator (trusted, approved at once)
//! or mirrored from a provider notification.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{ClientId, Money, PaymentId, Timestamp, ValidationError};

use super::BillingError;

/// Settlement state of a payment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Pending,
    Approved,
    Rejected,
    Refunded,
}

impl PaymentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            PaymentStatus::Pending => "pending",
            PaymentStatus::Approved => "approved",
            PaymentStatus::Rejected => "rejected",
            PaymentStatus::Refunded => "refunded",
        }
    }
}

impl fmt::Display for PaymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PaymentStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(PaymentStatus::Pending),
            "approved" => Ok(PaymentStatus::Approved),
            "rejected" => Ok(PaymentStatus::Rejected),
            "refunded" => Ok(PaymentStatus::Refunded),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown payment status '{}'", other),
            )),
        }
    }
}

/// Fields shared by both payment sources.
#[derive(Debug, Clone)]
pub struct NewPayment {
    pub client_id: ClientId,
    pub amount: Money,
    pub paid_at: Timestamp,
    pub external_transaction_id: String,
    pub method: String,
    pub description: Option<String>,
}

/// A single billing transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub id: PaymentId,
    pub client_id: ClientId,
    pub amount: Money,
    pub paid_at: Timestamp,
    pub status: PaymentStatus,

    /// Provider transaction id or operator reference. Used to match
    /// provider redeliveries to an existing record.
    pub external_transaction_id: String,

    /// Free text: "manual", "MercadoPago - visa", ...
    pub method: String,
    pub description: Option<String>,

    /// Set once, by the invoice issuer.
    pub invoice_generated: bool,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Payment {
    /// Operator-registered payment. Trusted, so approved immediately.
    pub fn manual(new: NewPayment, now: Timestamp) -> Result<Self, ValidationError> {
        Self::build(new, PaymentStatus::Approved, now)
    }

    /// Payment mirrored from the provider.
    pub fn from_provider(
        new: NewPayment,
        approved: bool,
        now: Timestamp,
    ) -> Result<Self, ValidationError> {
        let status = if approved {
            PaymentStatus::Approved
        } else {
            PaymentStatus::Pending
        };
        Self::build(new, status, now)
    }

    fn build(new: NewPayment, status: PaymentStatus, now: Timestamp) -> Result<Self, ValidationError> {
        let amount = new.amount.ensure_positive("amount")?;
        if new.external_transaction_id.trim().is_empty() {
            return Err(ValidationError::empty_field("external_transaction_id"));
        }
        if new.method.trim().is_empty() {
            return Err(ValidationError::empty_field("method"));
        }
        Ok(Self {
            id: PaymentId::new(),
            client_id: new.client_id,
            amount,
            paid_at: new.paid_at,
            status,
            external_transaction_id: new.external_transaction_id,
            method: new.method,
            description: new.description,
            invoice_generated: false,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn is_approved(&self) -> bool {
        self.status == PaymentStatus::Approved
    }

    /// Overwrites the settlement state. Any of the four states may follow any other.
    pub fn set_status(&mut self, status: PaymentStatus, now: Timestamp) {
        self.status = status;
        self.updated_at = now;
    }

    /// Checks that an invoice may be issued for this payment.
    pub fn ensure_invoiceable(&self) -> Result<(), BillingError> {
        if !self.is_approved() {
            return Err(BillingError::invalid_state(format!(
                "payment {} is {}, only approved payments can be invoiced",
                self.id, self.status
            )));
        }
        if self.invoice_generated {
            return Err(BillingError::invalid_state(format!(
                "payment {} already has an invoice",
                self.id
            )));
        }
        Ok(())
    }

    /// Flags the payment as invoiced.
    pub fn mark_invoiced(&mut self, now: Timestamp) -> Result<(), BillingError> {
        self.ensure_invoiceable()?;
        self.invoice_generated = true;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_payment() -> NewPayment {
        NewPayment {
            client_id: ClientId::new(),
            amount: Money::from_cents(15_000),
            paid_at: Timestamp::now(),
            external_transaction_id: "TX-1".to_string(),
            method: "manual".to_string(),
            description: None,
        }
    }

    #[test]
    fn manual_payment_is_approved() {
        let payment = Payment::manual(new_payment(), Timestamp::now()).unwrap();
        assert_eq!(payment.status, PaymentStatus::Approved);
        assert!(!payment.invoice_generated);
    }

    #[test]
    fn provider_payment_follows_approval_flag() {
        let pending = Payment::from_provider(new_payment(), false, Timestamp::now()).unwrap();
        assert_eq!(pending.status, PaymentStatus::Pending);
    }

    #[test]
    fn amount_must_be_positive() {
        let mut new = new_payment();
        new.amount = Money::zero();
        assert!(Payment::manual(new, Timestamp::now()).is_err());
    }

    #[test]
    fn transaction_id_is_required() {
        let mut new = new_payment();
        new.external_transaction_id = "  ".to_string();
        assert_eq!(
            Payment::manual(new, Timestamp::now()),
            Err(ValidationError::empty_field("external_transaction_id"))
        );
    }

    #[test]
    fn status_parse_rejects_unknown_value() {
        assert!("settled".parse::<PaymentStatus>().is_err());
        assert_eq!("refunded".parse::<PaymentStatus>().unwrap(), PaymentStatus::Refunded);
    }

    #[test]
    fn mark_invoiced_happens_once() {
        let mut payment = Payment::manual(new_payment(), Timestamp::now()).unwrap();
        payment.mark_invoiced(Timestamp::now()).unwrap();
        assert!(payment.invoice_generated);
        assert!(matches!(
            payment.mark_invoiced(Timestamp::now()),
            Err(BillingError::InvalidState(_))
        ));
    }

    #[test]
    fn pending_payment_is_not_invoiceable() {
        let payment = Payment::from_provider(new_payment(), false, Timestamp::now()).unwrap();
        assert!(matches!(
            payment.ensure_invoiceable(),
            Err(BillingError::InvalidState(_))
        ));
    }
}
