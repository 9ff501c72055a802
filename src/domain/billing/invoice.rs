//! Invoice documents issued from approved payments.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{
    ClientId, InvoiceId, Money, PaymentId, StateMachine, Timestamp, ValidationError,
};

use super::{BillingError, Client, InvoiceNumber, Payment};

/// Invoice lifecycle. Voiding is final.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Issued,
    Voided,
}

impl InvoiceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InvoiceStatus::Issued => "issued",
            InvoiceStatus::Voided => "voided",
        }
    }
}

impl StateMachine for InvoiceStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            InvoiceStatus::Issued => vec![InvoiceStatus::Voided],
            InvoiceStatus::Voided => vec![],
        }
    }
}

impl fmt::Display for InvoiceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for InvoiceStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "issued" => Ok(InvoiceStatus::Issued),
            "voided" => Ok(InvoiceStatus::Voided),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown invoice status '{}'", other),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub description: String,
    pub amount: Money,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Invoice {
    pub id: InvoiceId,
    pub client_id: ClientId,

    /// Originating payment. At most one invoice exists per payment.
    pub payment_id: PaymentId,

    pub number: InvoiceNumber,
    pub issued_at: Timestamp,
    pub total: Money,
    pub line_items: Vec<LineItem>,
    pub status: InvoiceStatus,
    pub document_url: Option<String>,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Invoice {
    /// Builds the monthly-subscription invoice for an approved payment.
    pub fn issue_for(
        payment: &Payment,
        client: &Client,
        number: InvoiceNumber,
        now: Timestamp,
    ) -> Result<Self, BillingError> {
        payment.ensure_invoiceable()?;
        Ok(Self {
            id: InvoiceId::new(),
            client_id: client.id,
            payment_id: payment.id,
            number,
            issued_at: now,
            total: payment.amount,
            line_items: vec![LineItem {
                description: format!("Monthly subscription - {}", client.program),
                amount: payment.amount,
            }],
            status: InvoiceStatus::Issued,
            document_url: None,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn void(&mut self, now: Timestamp) -> Result<(), BillingError> {
        self.status = self.status.transition_to(InvoiceStatus::Voided).map_err(|_| {
            BillingError::invalid_state(format!("invoice {} is already voided", self.number))
        })?;
        self.updated_at = now;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::billing::{NewClient, NewPayment, Plan, PlanType, Program};

    fn client() -> Client {
        Client::create(
            NewClient {
                name: "Limpiezas Sur".to_string(),
                email: "ops@limpiezas.com".to_string(),
                phone: "123".to_string(),
                program: Program::CleanOrg,
                available_plans: vec![Plan {
                    plan_type: PlanType::Basic,
                    price: Money::from_cents(9_900),
                    description: None,
                }],
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    fn approved_payment(client: &Client) -> Payment {
        Payment::manual(
            NewPayment {
                client_id: client.id,
                amount: Money::from_cents(9_900),
                paid_at: Timestamp::now(),
                external_transaction_id: "TX-9".to_string(),
                method: "manual".to_string(),
                description: None,
            },
            Timestamp::now(),
        )
        .unwrap()
    }

    #[test]
    fn issue_builds_single_line_item() {
        let client = client();
        let payment = approved_payment(&client);
        let invoice =
            Invoice::issue_for(&payment, &client, InvoiceNumber::first(), Timestamp::now()).unwrap();

        assert_eq!(invoice.total, payment.amount);
        assert_eq!(invoice.status, InvoiceStatus::Issued);
        assert_eq!(invoice.line_items.len(), 1);
        assert_eq!(
            invoice.line_items[0].description,
            "Monthly subscription - CleanOrg"
        );
    }

    #[test]
    fn void_is_one_way() {
        let client = client();
        let payment = approved_payment(&client);
        let mut invoice =
            Invoice::issue_for(&payment, &client, InvoiceNumber::first(), Timestamp::now()).unwrap();

        invoice.void(Timestamp::now()).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Voided);
        assert!(matches!(
            invoice.void(Timestamp::now()),
            Err(BillingError::InvalidState(_))
        ));
    }

    #[test]
    fn voided_is_terminal() {
        assert!(InvoiceStatus::Voided.is_terminal());
        assert!(InvoiceStatus::Issued.can_transition_to(&InvoiceStatus::Voided));
    }
}
