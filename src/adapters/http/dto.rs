//! DTOs shared across the billing endpoints.
//!
//! Amounts cross the wire in major units (`1500.5`), dates as RFC 3339.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingError, CurrentPlan, Plan, PlanType};
use crate::domain::foundation::{Money, Timestamp};

/// A plan catalog entry as sent and received by the API.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PlanDto {
    pub plan_type: PlanType,
    pub price: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl From<&Plan> for PlanDto {
    fn from(plan: &Plan) -> Self {
        Self {
            plan_type: plan.plan_type,
            price: plan.price.as_major(),
            description: plan.description.clone(),
        }
    }
}

impl TryFrom<PlanDto> for Plan {
    type Error = BillingError;

    fn try_from(dto: PlanDto) -> Result<Self, Self::Error> {
        Ok(Plan::new(
            dto.plan_type,
            Money::from_major(dto.price),
            dto.description,
        )?)
    }
}

/// Converts a request catalog, failing on the first invalid entry.
pub fn plans_from_dtos(dtos: Vec<PlanDto>) -> Result<Vec<Plan>, BillingError> {
    dtos.into_iter().map(Plan::try_from).collect()
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CurrentPlanDto {
    pub plan_type: PlanType,
    pub price: f64,
    pub activated_at: DateTime<Utc>,
}

impl From<&CurrentPlan> for CurrentPlanDto {
    fn from(plan: &CurrentPlan) -> Self {
        Self {
            plan_type: plan.plan_type,
            price: plan.price.as_major(),
            activated_at: *plan.activated_at.as_datetime(),
        }
    }
}

/// Query string shared by the filtered listings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ListFilterParams {
    pub client_id: Option<uuid::Uuid>,
    pub from: Option<String>,
    pub to: Option<String>,
    pub status: Option<String>,
}

/// Which end of a date range a bound describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Bound {
    Start,
    End,
}

/// Parses a range bound given as RFC 3339 or as a bare `YYYY-MM-DD` date.
///
/// A bare date covers the whole day: as an end bound it means 23:59:59.999.
pub fn parse_bound(field: &str, value: &str, bound: Bound) -> Result<Timestamp, BillingError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(value) {
        return Ok(Timestamp::from_datetime(dt.with_timezone(&Utc)));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d").map_err(|_| {
        BillingError::invalid_argument(field, format!("'{}' is not a date", value))
    })?;
    Ok(match bound {
        Bound::Start => Timestamp::start_of_day(date),
        Bound::End => Timestamp::end_of_day(date),
    })
}

/// Parses an optional bound, passing `None` through.
pub fn parse_optional_bound(
    field: &str,
    value: Option<&str>,
    bound: Bound,
) -> Result<Option<Timestamp>, BillingError> {
    value
        .filter(|v| !v.is_empty())
        .map(|v| parse_bound(field, v, bound))
        .transpose()
}

/// Parses an optional status string into its enum.
pub fn parse_status<T>(value: Option<&str>) -> Result<Option<T>, BillingError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    value
        .filter(|v| !v.is_empty())
        .map(|v| {
            v.parse::<T>()
                .map_err(|e| BillingError::invalid_argument("status", e.to_string()))
        })
        .transpose()
}
