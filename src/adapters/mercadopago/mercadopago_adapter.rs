//! MercadoPago payment provider adapter.
//!
//! Implements `PaymentProvider` over the preapproval and payments REST APIs
//! with bearer-token authentication.
//!
//! # Configuration
//!
//! ```ignore
//! let config = MercadoPagoConfig::new(access_token);
//! let adapter = MercadoPagoAdapter::new(config);
//! ```

use async_trait::async_trait;
use reqwest::StatusCode;
use secrecy::{ExposeSecret, SecretString};
use serde::de::DeserializeOwned;

use crate::domain::billing::{ProviderPaymentStatus, ProviderSubscriptionStatus};
use crate::domain::foundation::Money;
use crate::ports::{
    CreateSubscriptionRequest, CreatedSubscription, PaymentError, PaymentErrorCode,
    PaymentProvider, ProviderPayment, ProviderSubscription, SubscriptionUpdate,
};

use super::api_types::{
    AmountUpdate, ApiErrorBody, AutoRecurring, PaymentResponse, PreapprovalRequest,
    PreapprovalResponse, PreapprovalUpdate,
};

pub const DEFAULT_API_BASE_URL: &str = "https://api.mercadopago.com";

/// MercadoPago API configuration.
#[derive(Clone)]
pub struct MercadoPagoConfig {
    access_token: SecretString,
    api_base_url: String,
}

impl MercadoPagoConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
        }
    }

    /// Set a custom API base URL (for testing).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }
}

pub struct MercadoPagoAdapter {
    config: MercadoPagoConfig,
    http_client: reqwest::Client,
}

impl MercadoPagoAdapter {
    pub fn new(config: MercadoPagoConfig) -> Self {
        Self {
            config,
            http_client: reqwest::Client::new(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.config.api_base_url, path)
    }

    /// Sends the request and decodes a 2xx JSON body.
    async fn send<T: DeserializeOwned>(
        &self,
        request: reqwest::RequestBuilder,
        resource: &str,
    ) -> Result<T, PaymentError> {
        let response = request
            .bearer_auth(self.config.access_token.expose_secret())
            .send()
            .await
            .map_err(|e| PaymentError::network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let text = response.text().await.unwrap_or_default();
            tracing::error!(status = %status, resource, error = %text, "MercadoPago request failed");
            return Err(error_for_status(status, resource, &text));
        }

        response.json().await.map_err(|e| {
            PaymentError::new(
                PaymentErrorCode::ProviderError,
                format!("Failed to parse MercadoPago response: {}", e),
            )
        })
    }
}

fn error_for_status(status: StatusCode, resource: &str, body: &str) -> PaymentError {
    let detail = serde_json::from_str::<ApiErrorBody>(body)
        .ok()
        .and_then(|b| b.message.or(b.error))
        .unwrap_or_else(|| body.to_string());

    let error = match status {
        StatusCode::NOT_FOUND => PaymentError::not_found(resource),
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => PaymentError::authentication(detail),
        StatusCode::TOO_MANY_REQUESTS => {
            PaymentError::new(PaymentErrorCode::RateLimitExceeded, detail)
        }
        s if s.is_client_error() => PaymentError::invalid_request(detail),
        _ => PaymentError::provider(format!("MercadoPago API error: {}", detail)),
    };
    error.with_provider_code(status.as_u16().to_string())
}

fn subscription_from(response: PreapprovalResponse) -> ProviderSubscription {
    let (recurring_amount, frequency, frequency_unit) = match response.auto_recurring {
        Some(recurring) => (
            Money::from_major(recurring.transaction_amount),
            recurring.frequency,
            recurring.frequency_type,
        ),
        None => (Money::zero(), 0, String::new()),
    };
    ProviderSubscription {
        id: response.id,
        status: ProviderSubscriptionStatus::from_provider(&response.status),
        recurring_amount,
        frequency,
        frequency_unit,
    }
}

#[async_trait]
impl PaymentProvider for MercadoPagoAdapter {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<CreatedSubscription, PaymentError> {
        let body = PreapprovalRequest {
            reason: request.reason,
            auto_recurring: AutoRecurring {
                frequency: request.frequency_months,
                frequency_type: "months".to_string(),
                transaction_amount: request.amount.as_major(),
                currency_id: Some(request.currency),
            },
            payer_email: request.payer_email,
            back_url: request.back_url,
            status: "pending",
        };

        let created: PreapprovalResponse = self
            .send(self.http_client.post(self.url("/preapproval")).json(&body), "Subscription")
            .await?;

        let init_point = created.init_point.ok_or_else(|| {
            PaymentError::provider("MercadoPago did not return a checkout URL")
        })?;

        Ok(CreatedSubscription {
            id: created.id,
            init_point,
        })
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<(), PaymentError> {
        let body = PreapprovalUpdate {
            status: update.status.map(|s| s.as_str()),
            auto_recurring: update.amount.map(|amount| AmountUpdate {
                transaction_amount: amount.as_major(),
            }),
        };

        let url = self.url(&format!("/preapproval/{}", subscription_id));
        let _: PreapprovalResponse = self
            .send(self.http_client.put(url).json(&body), "Subscription")
            .await?;
        Ok(())
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        let url = self.url(&format!("/preapproval/{}", subscription_id));
        let response: PreapprovalResponse =
            self.send(self.http_client.get(url), "Subscription").await?;
        Ok(subscription_from(response))
    }

    async fn get_payment(&self, payment_id: &str) -> Result<ProviderPayment, PaymentError> {
        let url = self.url(&format!("/v1/payments/{}", payment_id));
        let response: PaymentResponse = self.send(self.http_client.get(url), "Payment").await?;

        Ok(ProviderPayment {
            id: response.id.to_string(),
            amount: Money::from_major(response.transaction_amount),
            status: ProviderPaymentStatus::from_provider(&response.status),
            method_id: response.payment_method_id.unwrap_or_default(),
            preapproval_id: response.preapproval_id,
        })
    }
}
