//! Payment provider port for recurring billing agreements.
//!
//! The provider is the system of record for whether a subscription is
//! authorized, paused or cancelled and for the outcome of each charge.
//! Handlers receive an implementation through `Arc<dyn PaymentProvider>`.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::domain::billing::{BillingError, ProviderPaymentStatus, ProviderSubscriptionStatus};
use crate::domain::foundation::{DomainError, ErrorCode, Money};

/// Port for the external recurring-payments service.
#[async_trait]
pub trait PaymentProvider: Send + Sync {
    /// Creates a recurring agreement the payer must authorize at `init_point`.
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<CreatedSubscription, PaymentError>;

    /// Changes status and/or recurring amount of an agreement.
    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<(), PaymentError>;

    /// Fetches the live state of an agreement.
    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError>;

    /// Fetches a single charge by provider payment id.
    async fn get_payment(&self, payment_id: &str) -> Result<ProviderPayment, PaymentError>;
}

/// Request to open a recurring agreement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateSubscriptionRequest {
    /// Human-readable reason shown to the payer.
    pub reason: String,
    pub amount: Money,
    pub currency: String,
    pub frequency_months: u32,
    pub payer_email: String,
    /// Where the provider sends the payer back after checkout.
    pub back_url: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreatedSubscription {
    pub id: String,
    /// Checkout URL for the payer.
    pub init_point: String,
}

/// Target status for [`PaymentProvider::update_subscription`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SubscriptionStatusChange {
    Authorized,
    Paused,
    Cancelled,
}

impl SubscriptionStatusChange {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubscriptionStatusChange::Authorized => "authorized",
            SubscriptionStatusChange::Paused => "paused",
            SubscriptionStatusChange::Cancelled => "cancelled",
        }
    }
}

/// Partial update of an agreement. Unset fields are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SubscriptionUpdate {
    pub status: Option<SubscriptionStatusChange>,
    pub amount: Option<Money>,
}

impl SubscriptionUpdate {
    pub fn status(status: SubscriptionStatusChange) -> Self {
        Self {
            status: Some(status),
            amount: None,
        }
    }

    pub fn amount(amount: Money) -> Self {
        Self {
            status: None,
            amount: Some(amount),
        }
    }
}

/// Live agreement as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderSubscription {
    pub id: String,
    pub status: ProviderSubscriptionStatus,
    pub recurring_amount: Money,
    pub frequency: u32,
    pub frequency_unit: String,
}

/// A charge as reported by the provider.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderPayment {
    pub id: String,
    pub amount: Money,
    pub status: ProviderPaymentStatus,
    pub method_id: String,
    /// Agreement the charge belongs to, if it is a recurring charge.
    pub preapproval_id: Option<String>,
}

/// Payment provider errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentError {
    /// Error code for categorization.
    pub code: PaymentErrorCode,

    /// Human-readable message.
    pub message: String,

    /// Provider's error code (if available).
    pub provider_code: Option<String>,

    /// Whether the operation can be retried.
    pub retryable: bool,
}

impl PaymentError {
    pub fn new(code: PaymentErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            provider_code: None,
            retryable: code.is_retryable(),
        }
    }

    pub fn with_provider_code(mut self, code: impl Into<String>) -> Self {
        self.provider_code = Some(code.into());
        self
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::NetworkError, message)
    }

    pub fn authentication(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::AuthenticationError, message)
    }

    pub fn not_found(resource: &str) -> Self {
        Self::new(PaymentErrorCode::NotFound, format!("{} not found", resource))
    }

    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::InvalidRequest, message)
    }

    pub fn provider(message: impl Into<String>) -> Self {
        Self::new(PaymentErrorCode::ProviderError, message)
    }
}

impl std::fmt::Display for PaymentError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.code, self.message)
    }
}

impl std::error::Error for PaymentError {}

impl From<PaymentError> for DomainError {
    fn from(err: PaymentError) -> Self {
        let mut domain = DomainError::new(ErrorCode::ExternalServiceError, err.message);
        if let Some(code) = err.provider_code {
            domain = domain.with_detail("provider_code", code);
        }
        domain
    }
}

impl From<PaymentError> for BillingError {
    fn from(err: PaymentError) -> Self {
        BillingError::external_provider(err.to_string())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PaymentErrorCode {
    /// Network connectivity issue.
    NetworkError,

    /// API credentials rejected.
    AuthenticationError,

    /// Resource not found.
    NotFound,

    /// Provider rejected the request payload.
    InvalidRequest,

    /// Rate limit exceeded.
    RateLimitExceeded,

    /// Provider-side failure.
    ProviderError,

    /// Response could not be understood.
    Unknown,
}

impl PaymentErrorCode {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            PaymentErrorCode::NetworkError
                | PaymentErrorCode::RateLimitExceeded
                | PaymentErrorCode::ProviderError
        )
    }
}

impl std::fmt::Display for PaymentErrorCode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            PaymentErrorCode::NetworkError => "network_error",
            PaymentErrorCode::AuthenticationError => "authentication_error",
            PaymentErrorCode::NotFound => "not_found",
            PaymentErrorCode::InvalidRequest => "invalid_request",
            PaymentErrorCode::RateLimitExceeded => "rate_limit_exceeded",
            PaymentErrorCode::ProviderError => "provider_error",
            PaymentErrorCode::Unknown => "unknown",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn network_errors_are_retryable() {
        assert!(PaymentError::network("timeout").retryable);
        assert!(!PaymentError::not_found("Subscription").retryable);
    }

    #[test]
    fn payment_error_displays_code_and_message() {
        let err = PaymentError::not_found("Payment");
        assert_eq!(err.to_string(), "not_found: Payment not found");
    }

    #[test]
    fn payment_error_maps_to_external_provider() {
        let err: BillingError = PaymentError::provider("boom").into();
        assert!(matches!(err, BillingError::ExternalProvider(_)));
    }

    #[test]
    fn payment_error_keeps_provider_code_in_domain_error() {
        let err: DomainError = PaymentError::invalid_request("bad amount")
            .with_provider_code("400")
            .into();
        assert_eq!(err.code, ErrorCode::ExternalServiceError);
        assert_eq!(err.details.get("provider_code"), Some(&"400".to_string()));
    }

    #[test]
    fn update_constructors_set_one_field() {
        let update = SubscriptionUpdate::status(SubscriptionStatusChange::Paused);
        assert_eq!(update.status, Some(SubscriptionStatusChange::Paused));
        assert!(update.amount.is_none());

        let update = SubscriptionUpdate::amount(Money::from_cents(100));
        assert!(update.status.is_none());
    }

    #[test]
    fn payment_provider_is_object_safe() {
        fn _accepts(_p: &dyn PaymentProvider) {}
    }
}
