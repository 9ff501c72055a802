//! Payment provider configuration (MercadoPago)

use secrecy::{ExposeSecret, SecretString};
use serde::Deserialize;

use super::error::ValidationError;
use crate::adapters::mercadopago::DEFAULT_API_BASE_URL;

#[derive(Debug, Clone, Deserialize)]
pub struct PaymentConfig {
    /// `TEST-…` or `APP_USR-…` access token
    pub access_token: SecretString,

    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Enables `x-signature` verification on the webhook endpoint
    #[serde(default)]
    pub webhook_secret: Option<SecretString>,

    /// ISO currency of recurring charges
    #[serde(default = "default_currency")]
    pub currency: String,

    /// Where the provider redirects the payer after checkout
    #[serde(default = "default_back_url")]
    pub back_url: String,
}

impl PaymentConfig {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: SecretString::new(access_token.into()),
            api_base_url: default_api_base_url(),
            webhook_secret: None,
            currency: default_currency(),
            back_url: default_back_url(),
        }
    }

    /// Sandbox credentials start with `TEST-`.
    pub fn is_test_mode(&self) -> bool {
        self.access_token.expose_secret().starts_with("TEST-")
    }

    pub fn validate(&self, production: bool) -> Result<(), ValidationError> {
        let token = self.access_token.expose_secret();
        if token.is_empty() {
            return Err(ValidationError::MissingRequired("PAYMENT__ACCESS_TOKEN"));
        }
        if !token.starts_with("TEST-") && !token.starts_with("APP_USR-") {
            return Err(ValidationError::InvalidAccessToken);
        }
        if !self.api_base_url.starts_with("http://") && !self.api_base_url.starts_with("https://")
        {
            return Err(ValidationError::InvalidApiBaseUrl);
        }
        if self.currency.len() != 3 || !self.currency.chars().all(|c| c.is_ascii_uppercase()) {
            return Err(ValidationError::InvalidCurrency);
        }
        if !self.back_url.starts_with("http://") && !self.back_url.starts_with("https://") {
            return Err(ValidationError::InvalidBackUrl);
        }
        if production && self.webhook_secret.is_none() {
            return Err(ValidationError::WebhookSecretRequired);
        }
        Ok(())
    }
}

fn default_api_base_url() -> String {
    DEFAULT_API_BASE_URL.to_string()
}

fn default_currency() -> String {
    "ARS".to_string()
}

fn default_back_url() -> String {
    "http://localhost:5000/subscription/result".to_string()
}
