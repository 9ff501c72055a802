//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid bind address '{0}', expected an IP")]
    InvalidHost(String),

    #[error("Invalid port number")]
    InvalidPort,

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Invalid MercadoPago access token format")]
    InvalidAccessToken,

    #[error("Invalid API base URL")]
    InvalidApiBaseUrl,

    #[error("Currency must be a three-letter ISO code")]
    InvalidCurrency,

    #[error("Subscription back_url must be an http(s) URL")]
    InvalidBackUrl,

    #[error("Webhook secret is required in production")]
    WebhookSecretRequired,

    #[error("Invalid schedule time '{0}', expected HH:MM")]
    InvalidScheduleTime(String),

    #[error("Grace period must be between 0 and 60 days")]
    InvalidGracePeriod,

    #[error("Reminder window must be between 1 and 30 days")]
    InvalidReminderWindow,
}
