//! Money value object.
//!
//! Amounts are kept in minor units (cents) so arithmetic never drifts.
//! There is no currency on the value: the service bills in a single
//! configured currency.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::ValidationError;

/// A monetary amount in cents.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Money(i64);

impl Money {
    /// Zero amount.
    pub const fn zero() -> Self {
        Self(0)
    }

    /// Wraps an amount already expressed in cents.
    pub const fn from_cents(cents: i64) -> Self {
        Self(cents)
    }

    /// Converts a major-unit amount (e.g. `1500.5`) to cents, rounding half away from zero.
    pub fn from_major(amount: f64) -> Self {
        Self((amount * 100.0).round() as i64)
    }

    /// Amount in cents.
    pub const fn cents(&self) -> i64 {
        self.0
    }

    /// Amount in major units, as sent to the payment provider.
    pub fn as_major(&self) -> f64 {
        self.0 as f64 / 100.0
    }

    /// True when the amount is strictly greater than zero.
    pub const fn is_positive(&self) -> bool {
        self.0 > 0
    }

    /// Fails unless the amount is strictly greater than zero.
    pub fn ensure_positive(self, field: &str) -> Result<Self, ValidationError> {
        if self.is_positive() {
            Ok(self)
        } else {
            Err(ValidationError::not_positive(field, self.0))
        }
    }
}

impl fmt::Display for Money {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let sign = if self.0 < 0 { "-" } else { "" };
        let abs = self.0.unsigned_abs();
        write!(f, "{}{}.{:02}", sign, abs / 100, abs % 100)
    }
}
