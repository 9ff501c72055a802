//! Request and response DTOs for client endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::adapters::http::dto::{CurrentPlanDto, PlanDto};
use crate::domain::billing::{BillingStatus, Client, ClientChanges, ClientStatus, Program};

#[derive(Debug, Clone, Deserialize)]
pub struct CreateClientRequest {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub program: Program,
    pub available_plans: Vec<PlanDto>,
}

/// Every field is optional; absent fields are left as they are.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateClientRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<Program>,
    pub status: Option<ClientStatus>,
}

impl From<UpdateClientRequest> for ClientChanges {
    fn from(req: UpdateClientRequest) -> Self {
        ClientChanges {
            name: req.name,
            email: req.email,
            phone: req.phone,
            program: req.program,
            status: req.status,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct UpdatePlansRequest {
    pub available_plans: Vec<PlanDto>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ClientResponse {
    pub id: String,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub program: Program,
    pub started_at: DateTime<Utc>,
    pub status: ClientStatus,
    pub available_plans: Vec<PlanDto>,
    pub current_plan: Option<CurrentPlanDto>,
    pub monthly_actual_spend: f64,
    pub subscription_id: Option<String>,
    pub billing_status: BillingStatus,
    pub next_payment_due: Option<DateTime<Utc>>,
    pub last_payment_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id.to_string(),
            available_plans: client.available_plans.iter().map(PlanDto::from).collect(),
            current_plan: client.current_plan.as_ref().map(CurrentPlanDto::from),
            monthly_actual_spend: client.monthly_actual_spend.as_major(),
            next_payment_due: client.next_payment_due.map(|t| *t.as_datetime()),
            last_payment_at: client.last_payment_at.map(|t| *t.as_datetime()),
            started_at: *client.started_at.as_datetime(),
            created_at: *client.created_at.as_datetime(),
            updated_at: *client.updated_at.as_datetime(),
            name: client.name,
            email: client.email,
            phone: client.phone,
            program: client.program,
            status: client.status,
            subscription_id: client.subscription_id,
            billing_status: client.billing_status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_deserializes_snake_case_enums() {
        let json = r#"{
            "name": "Dr. Ana",
            "email": "ana@clinic.com",
            "phone": "555-0101",
            "program": "odonto_care",
            "available_plans": [{"plan_type": "basic", "price": 100.0}]
        }"#;
        let req: CreateClientRequest = serde_json::from_str(json).unwrap();
        assert_eq!(req.program, Program::OdontoCare);
        assert_eq!(req.available_plans.len(), 1);
    }

    #[test]
    fn update_request_allows_partial_bodies() {
        let req: UpdateClientRequest = serde_json::from_str(r#"{"status": "suspended"}"#).unwrap();
        let changes = ClientChanges::from(req);
        assert_eq!(changes.status, Some(ClientStatus::Suspended));
        assert!(changes.name.is_none());
    }
}
