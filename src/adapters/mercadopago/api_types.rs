//! MercadoPago REST payloads.
//!
//! Only the fields the billing core reads are modelled; everything else in
//! the provider's responses is ignored.

use serde::{Deserialize, Serialize};

/// MercadoPago sends some ids as JSON numbers and others as strings.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(untagged)]
pub enum ResourceId {
    Number(i64),
    Text(String),
}

impl std::fmt::Display for ResourceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ResourceId::Number(n) => write!(f, "{}", n),
            ResourceId::Text(s) => write!(f, "{}", s),
        }
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// Preapproval (recurring agreement)
// ════════════════════════════════════════════════════════════════════════════════

/// Body of `POST /preapproval`.
#[derive(Debug, Clone, Serialize)]
pub struct PreapprovalRequest {
    pub reason: String,
    pub auto_recurring: AutoRecurring,
    pub payer_email: String,
    pub back_url: String,
    pub status: &'static str,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AutoRecurring {
    pub frequency: u32,
    pub frequency_type: String,
    pub transaction_amount: f64,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub currency_id: Option<String>,
}

/// Body of `PUT /preapproval/{id}`. Absent fields are left unchanged.
#[derive(Debug, Clone, Default, Serialize)]
pub struct PreapprovalUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub auto_recurring: Option<AmountUpdate>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AmountUpdate {
    pub transaction_amount: f64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PreapprovalResponse {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub init_point: Option<String>,
    #[serde(default)]
    pub auto_recurring: Option<AutoRecurring>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Payments
// ════════════════════════════════════════════════════════════════════════════════

/// Response of `GET /v1/payments/{id}`.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentResponse {
    pub id: ResourceId,
    pub transaction_amount: f64,
    pub status: String,
    #[serde(default)]
    pub payment_method_id: Option<String>,
    #[serde(default)]
    pub preapproval_id: Option<String>,
}

/// Error body returned on non-2xx responses.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════════
// Webhook notification
// ════════════════════════════════════════════════════════════════════════════════

/// Notification body posted to the webhook endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookNotification {
    #[serde(rename = "type", default)]
    pub event_type: Option<String>,
    #[serde(default)]
    pub data: Option<WebhookData>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WebhookData {
    pub id: ResourceId,
}

impl WebhookNotification {
    pub fn data_id(&self) -> Option<String> {
        self.data.as_ref().map(|d| d.id.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn payment_id_may_be_numeric() {
        let body = r#"{"id": 123456789, "transaction_amount": 100.5, "status": "approved",
                       "payment_method_id": "visa", "preapproval_id": "pre_1"}"#;
        let parsed: PaymentResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.id.to_string(), "123456789");
        assert_eq!(parsed.preapproval_id.as_deref(), Some("pre_1"));
    }

    #[test]
    fn notification_data_id_accepts_string_or_number() {
        let text: WebhookNotification =
            serde_json::from_str(r#"{"type":"preapproval","data":{"id":"pre_1"}}"#).unwrap();
        let number: WebhookNotification =
            serde_json::from_str(r#"{"type":"payment","data":{"id":42}}"#).unwrap();

        assert_eq!(text.data_id().as_deref(), Some("pre_1"));
        assert_eq!(number.data_id().as_deref(), Some("42"));
    }

    #[test]
    fn update_omits_absent_fields() {
        let body = serde_json::to_value(PreapprovalUpdate {
            status: Some("paused"),
            auto_recurring: None,
        })
        .unwrap();
        assert_eq!(body, serde_json::json!({"status": "paused"}));
    }
}
