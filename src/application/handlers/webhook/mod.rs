//! Provider webhook handling.

mod handle_provider_webhook;

pub use handle_provider_webhook::{
    HandleProviderWebhookCommand, HandleProviderWebhookHandler, WebhookOutcome,
};
