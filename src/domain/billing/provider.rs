//! Provider-side states as seen by the billing domain.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status of a recurring agreement at the payment provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderSubscriptionStatus {
    Pending,
    Authorized,
    Paused,
    Cancelled,
    /// Any status this service does not act on.
    #[serde(other)]
    Unknown,
}

impl ProviderSubscriptionStatus {
    /// Parses the provider's wire value. Unrecognised values map to `Unknown`.
    pub fn from_provider(value: &str) -> Self {
        match value {
            "pending" => Self::Pending,
            "authorized" => Self::Authorized,
            "paused" => Self::Paused,
            "cancelled" => Self::Cancelled,
            _ => Self::Unknown,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Authorized => "authorized",
            Self::Paused => "paused",
            Self::Cancelled => "cancelled",
            Self::Unknown => "unknown",
        }
    }
}

impl fmt::Display for ProviderSubscriptionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Status of a single charge at the payment provider.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProviderPaymentStatus {
    Approved,
    /// Anything else (`pending`, `in_process`, `rejected`, ...), kept verbatim.
    Other(String),
}

impl ProviderPaymentStatus {
    pub fn from_provider(value: &str) -> Self {
        if value == "approved" {
            Self::Approved
        } else {
            Self::Other(value.to_string())
        }
    }

    pub fn is_approved(&self) -> bool {
        matches!(self, Self::Approved)
    }
}
