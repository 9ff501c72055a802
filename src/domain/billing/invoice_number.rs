//! Sequential, human-readable invoice numbers: `FACT-000001`, `FACT-000002`, ...

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::ValidationError;

const PREFIX: &str = "FACT-";
const WIDTH: usize = 6;

#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct InvoiceNumber(u64);

impl InvoiceNumber {
    /// Number used when no invoice exists yet.
    pub fn first() -> Self {
        Self(1)
    }

    /// Number that follows `latest`, or the first one.
    pub fn next_after(latest: Option<&InvoiceNumber>) -> Self {
        match latest {
            Some(number) => Self(number.0 + 1),
            None => Self::first(),
        }
    }

    pub fn from_sequence(sequence: u64) -> Result<Self, ValidationError> {
        if sequence == 0 {
            return Err(ValidationError::invalid_format(
                "invoice_number",
                "sequence starts at 1",
            ));
        }
        Ok(Self(sequence))
    }

    pub fn sequence(&self) -> u64 {
        self.0
    }
}

impl fmt::Display for InvoiceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:0width$}", PREFIX, self.0, width = WIDTH)
    }
}

impl FromStr for InvoiceNumber {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let digits = s.strip_prefix(PREFIX).ok_or_else(|| {
            ValidationError::invalid_format("invoice_number", format!("missing '{}' prefix", PREFIX))
        })?;
        if digits.len() < WIDTH || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(ValidationError::invalid_format(
                "invoice_number",
                format!("expected at least {} digits after prefix", WIDTH),
            ));
        }
        let sequence = digits
            .parse::<u64>()
            .map_err(|e| ValidationError::invalid_format("invoice_number", e.to_string()))?;
        Self::from_sequence(sequence)
    }
}

impl TryFrom<String> for InvoiceNumber {
    type Error = ValidationError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<InvoiceNumber> for String {
    fn from(number: InvoiceNumber) -> Self {
        number.to_string()
    }
}
