//! Application configuration module
//!
//! Type-safe configuration loaded from environment variables using the
//! `config` and `dotenvy` crates. Variables carry the `CLIENT_BILLING`
//! prefix and nested values are separated by double underscores.
//!
//! # Example
//!
//! ```no_run
//! use client_billing::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//! ```

mod billing;
mod database;
mod error;
mod payment;
mod server;

pub use billing::BillingConfig;
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use payment::PaymentConfig;
pub use server::{Deployment, ServerConfig};

use serde::Deserialize;

/// Root application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    #[serde(default)]
    pub server: ServerConfig,

    /// Absent means the in-memory store.
    #[serde(default)]
    pub database: Option<DatabaseConfig>,

    /// MercadoPago credentials and subscription defaults
    pub payment: PaymentConfig,

    #[serde(default)]
    pub billing: BillingConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `CLIENT_BILLING` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    ///
    /// - `CLIENT_BILLING__SERVER__PORT=8080` -> `server.port = 8080`
    /// - `CLIENT_BILLING__DATABASE__URL=...` -> `database.url = ...`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if required variables are missing or cannot
    /// be parsed into their expected types.
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("CLIENT_BILLING")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.server.validate()?;
        if let Some(database) = &self.database {
            database.validate()?;
        }
        self.payment.validate(self.is_production())?;
        self.billing.validate()?;
        Ok(())
    }

    pub fn is_production(&self) -> bool {
        self.server.is_production()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::sync::Mutex;

    // env vars are process-global
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: &[&str] = &[
        "CLIENT_BILLING__PAYMENT__ACCESS_TOKEN",
        "CLIENT_BILLING__PAYMENT__WEBHOOK_SECRET",
        "CLIENT_BILLING__DATABASE__URL",
        "CLIENT_BILLING__SERVER__PORT",
        "CLIENT_BILLING__SERVER__ENVIRONMENT",
        "CLIENT_BILLING__BILLING__GRACE_PERIOD_DAYS",
    ];

    fn set_minimal_env() {
        env::set_var("CLIENT_BILLING__PAYMENT__ACCESS_TOKEN", "TEST-abc123");
    }

    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    fn load_with(extra: &[(&str, &str)]) -> Result<AppConfig, ConfigError> {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        set_minimal_env();
        for (key, value) in extra {
            env::set_var(key, value);
        }
        let result = AppConfig::load();
        clear_env();
        result
    }

    #[test]
    fn test_load_minimal_environment() {
        let config = load_with(&[]).unwrap();

        assert!(config.database.is_none());
        assert_eq!(config.server.port, 5000);
        assert_eq!(config.payment.currency, "ARS");
        assert_eq!(config.billing.grace_period_days, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_nested_overrides() {
        let config = load_with(&[
            ("CLIENT_BILLING__DATABASE__URL", "postgres://localhost/billing"),
            ("CLIENT_BILLING__SERVER__PORT", "8080"),
            ("CLIENT_BILLING__BILLING__GRACE_PERIOD_DAYS", "7"),
        ])
        .unwrap();

        assert_eq!(
            config.database.as_ref().map(|d| d.url.as_str()),
            Some("postgres://localhost/billing")
        );
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.billing.grace_period_days, 7);
    }

    #[test]
    fn test_production_without_webhook_secret_fails_validation() {
        let config = load_with(&[("CLIENT_BILLING__SERVER__ENVIRONMENT", "production")]).unwrap();

        assert!(config.is_production());
        assert_eq!(
            config.validate(),
            Err(ValidationError::WebhookSecretRequired)
        );
    }

    #[test]
    fn test_missing_access_token_fails_load() {
        let _guard = ENV_MUTEX.lock().unwrap_or_else(|e| e.into_inner());
        clear_env();
        assert!(AppConfig::load().is_err());
    }
}
