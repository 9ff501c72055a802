//! Request and response DTOs for subscription endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::http::client::ClientResponse;
use crate::adapters::http::dto::CurrentPlanDto;
use crate::application::handlers::{CreateSubscriptionResult, SubscriptionStatusView};
use crate::domain::billing::{
    BillingStatus, ClientStatus, PlanType, ProviderSubscriptionStatus,
};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateSubscriptionRequest {
    pub plan_type: PlanType,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CreateSubscriptionResponse {
    pub subscription_id: String,
    pub init_point: String,
    pub client: ClientResponse,
}

impl From<CreateSubscriptionResult> for CreateSubscriptionResponse {
    fn from(result: CreateSubscriptionResult) -> Self {
        Self {
            subscription_id: result.subscription_id,
            init_point: result.init_point,
            client: result.client.into(),
        }
    }
}

/// At least one of the two fields must be set.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateSubscriptionRequest {
    pub plan_type: Option<PlanType>,
    /// New recurring amount in major units.
    pub price: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SubscriptionStatusResponse {
    pub client_id: String,
    pub client_status: ClientStatus,
    pub billing_status: BillingStatus,
    pub current_plan: Option<CurrentPlanDto>,
    pub next_payment_due: Option<DateTime<Utc>>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub subscription: ProviderSubscriptionDto,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProviderSubscriptionDto {
    pub id: String,
    pub status: ProviderSubscriptionStatus,
    pub amount: f64,
    pub frequency: u32,
    pub frequency_type: String,
}

impl From<SubscriptionStatusView> for SubscriptionStatusResponse {
    fn from(view: SubscriptionStatusView) -> Self {
        Self {
            client_id: view.client_id.to_string(),
            client_status: view.client_status,
            billing_status: view.billing_status,
            current_plan: view.current_plan.as_ref().map(CurrentPlanDto::from),
            next_payment_due: view.next_payment_due.map(|t| *t.as_datetime()),
            last_payment_at: view.last_payment_at.map(|t| *t.as_datetime()),
            subscription: ProviderSubscriptionDto {
                id: view.subscription_id,
                status: view.provider_status,
                amount: view.recurring_amount.as_major(),
                frequency: view.frequency,
                frequency_type: view.frequency_unit,
            },
        }
    }
}
