//! MercadoPago payment provider integration.
//!
//! - `MercadoPagoAdapter`: REST client implementing `PaymentProvider`
//! - `WebhookSignatureVerifier`: `x-signature` check for notifications
//! - `MockPaymentProvider`: scriptable test double

mod api_types;
mod mercadopago_adapter;
mod mock_payment_provider;
mod webhook_signature;

pub use api_types::{ResourceId, WebhookData, WebhookNotification};
pub use mercadopago_adapter::{MercadoPagoAdapter, MercadoPagoConfig, DEFAULT_API_BASE_URL};
pub use mock_payment_provider::{MethodCall, MockPaymentProvider};
pub use webhook_signature::{SignatureError, SignatureHeader, WebhookSignatureVerifier};
