//! Extra charges billed to a client outside the recurring plan.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{
    ClientId, ExtraChargeId, Money, PaymentId, StateMachine, Timestamp, ValidationError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtraChargeStatus {
    #[default]
    Pending,
    Paid,
    Cancelled,
}

impl StateMachine for ExtraChargeStatus {
    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            ExtraChargeStatus::Pending => vec![ExtraChargeStatus::Paid, ExtraChargeStatus::Cancelled],
            ExtraChargeStatus::Paid | ExtraChargeStatus::Cancelled => vec![],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCharge {
    pub id: ExtraChargeId,
    pub client_id: ClientId,
    pub amount: Money,
    pub concept: String,
    pub issued_at: Timestamp,
    pub status: ExtraChargeStatus,

    /// Payment that settled the charge.
    pub payment_id: Option<PaymentId>,
}

impl ExtraCharge {
    pub fn new(
        client_id: ClientId,
        amount: Money,
        concept: impl Into<String>,
        issued_at: Timestamp,
    ) -> Result<Self, ValidationError> {
        let concept = concept.into();
        if concept.trim().is_empty() {
            return Err(ValidationError::empty_field("concept"));
        }
        Ok(Self {
            id: ExtraChargeId::new(),
            client_id,
            amount: amount.ensure_positive("amount")?,
            concept,
            issued_at,
            status: ExtraChargeStatus::Pending,
            payment_id: None,
        })
    }

    /// Marks the charge paid by the given payment.
    pub fn settle(&mut self, payment_id: PaymentId) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ExtraChargeStatus::Paid)?;
        self.payment_id = Some(payment_id);
        Ok(())
    }

    pub fn cancel(&mut self) -> Result<(), ValidationError> {
        self.status = self.status.transition_to(ExtraChargeStatus::Cancelled)?;
        Ok(())
    }
}
