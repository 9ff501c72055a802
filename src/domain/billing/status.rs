//! Client lifecycle and billing status.
//!
//! Client status changes are driven both by operators and by the
//! payment provider, so neither enum restricts its transitions.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

/// Lifecycle state of a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ClientStatus {
    /// Subscribed and billed.
    Active,

    /// Never subscribed, or subscription cancelled.
    #[default]
    Inactive,

    /// Subscription paused, usually for non-payment.
    Suspended,
}

impl ClientStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ClientStatus::Active => "active",
            ClientStatus::Inactive => "inactive",
            ClientStatus::Suspended => "suspended",
        }
    }
}

impl fmt::Display for ClientStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for ClientStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "active" => Ok(ClientStatus::Active),
            "inactive" => Ok(ClientStatus::Inactive),
            "suspended" => Ok(ClientStatus::Suspended),
            other => Err(ValidationError::invalid_format(
                "status",
                format!("unknown client status '{}'", other),
            )),
        }
    }
}

/// Where the client stands on the current billing period.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BillingStatus {
    #[default]
    Pending,
    Paid,
    Overdue,
}

impl BillingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            BillingStatus::Pending => "pending",
            BillingStatus::Paid => "paid",
            BillingStatus::Overdue => "overdue",
        }
    }
}

impl fmt::Display for BillingStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for BillingStatus {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(BillingStatus::Pending),
            "paid" => Ok(BillingStatus::Paid),
            "overdue" => Ok(BillingStatus::Overdue),
            other => Err(ValidationError::invalid_format(
                "billing_status",
                format!("unknown billing status '{}'", other),
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_a_fresh_client() {
        assert_eq!(ClientStatus::default(), ClientStatus::Inactive);
        assert_eq!(BillingStatus::default(), BillingStatus::Pending);
    }

    #[test]
    fn client_status_round_trips_through_str() {
        for status in [
            ClientStatus::Active,
            ClientStatus::Inactive,
            ClientStatus::Suspended,
        ] {
            assert_eq!(status.as_str().parse::<ClientStatus>().unwrap(), status);
        }
    }

    #[test]
    fn billing_status_rejects_unknown() {
        assert!("late".parse::<BillingStatus>().is_err());
    }
}
