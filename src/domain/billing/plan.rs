//! Plans, programs and the per-client plan catalog entries.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::domain::foundation::{Money, Timestamp, ValidationError};

/// Pricing tier a client can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlanType {
    Basic,
    Advanced,
    Pro,
}

impl PlanType {
    pub fn as_str(&self) -> &'static str {
        match self {
            PlanType::Basic => "basic",
            PlanType::Advanced => "advanced",
            PlanType::Pro => "pro",
        }
    }
}

impl fmt::Display for PlanType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for PlanType {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "basic" => Ok(PlanType::Basic),
            "advanced" => Ok(PlanType::Advanced),
            "pro" => Ok(PlanType::Pro),
            other => Err(ValidationError::invalid_format(
                "plan_type",
                format!("unknown plan type '{}'", other),
            )),
        }
    }
}

/// Product the client acquired.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Program {
    OdontoCare,
    CleanOrg,
    DistributionAdmin,
}

impl Program {
    pub fn as_str(&self) -> &'static str {
        match self {
            Program::OdontoCare => "odonto_care",
            Program::CleanOrg => "clean_org",
            Program::DistributionAdmin => "distribution_admin",
        }
    }

    /// Product name used on provider agreements and invoice lines.
    pub fn display_name(&self) -> &'static str {
        match self {
            Program::OdontoCare => "OdontoCare",
            Program::CleanOrg => "CleanOrg",
            Program::DistributionAdmin => "DistributionAdmin",
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

impl FromStr for Program {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "odonto_care" => Ok(Program::OdontoCare),
            "clean_org" => Ok(Program::CleanOrg),
            "distribution_admin" => Ok(Program::DistributionAdmin),
            other => Err(ValidationError::invalid_format(
                "program",
                format!("unknown program '{}'", other),
            )),
        }
    }
}

/// An entry in a client's plan catalog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    pub plan_type: PlanType,
    pub price: Money,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl Plan {
    /// Creates a catalog entry, rejecting non-positive prices.
    pub fn new(
        plan_type: PlanType,
        price: Money,
        description: Option<String>,
    ) -> Result<Self, ValidationError> {
        Ok(Self {
            plan_type,
            price: price.ensure_positive("price")?,
            description,
        })
    }
}

/// The plan a client is currently billed for.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CurrentPlan {
    pub plan_type: PlanType,
    pub price: Money,
    pub activated_at: Timestamp,
}

/// Checks a plan catalog: non-empty, positive prices, one entry per type.
pub fn validate_catalog(plans: &[Plan]) -> Result<(), ValidationError> {
    if plans.is_empty() {
        return Err(ValidationError::empty_field("available_plans"));
    }
    let mut seen = Vec::with_capacity(plans.len());
    for plan in plans {
        plan.price.ensure_positive("price")?;
        if seen.contains(&plan.plan_type) {
            return Err(ValidationError::duplicate(
                "available_plans",
                plan.plan_type.as_str(),
            ));
        }
        seen.push(plan.plan_type);
    }
    Ok(())
}
