//! Ports - interfaces the application layer depends on.
//!
//! Adapters in `crate::adapters` implement these traits; handlers receive
//! them as `Arc<dyn Trait>`.

mod client_repository;
mod invoice_repository;
mod payment_provider;
mod payment_repository;
mod reminder_notifier;

pub use client_repository::ClientRepository;
pub use invoice_repository::{InvoiceFilter, InvoiceRepository};
pub use payment_provider::{
    CreateSubscriptionRequest, CreatedSubscription, PaymentError, PaymentErrorCode,
    PaymentProvider, ProviderPayment, ProviderSubscription, SubscriptionStatusChange,
    SubscriptionUpdate,
};
pub use payment_repository::{PaymentFilter, PaymentRepository};
pub use reminder_notifier::{PaymentReminder, PaymentReminderNotifier};
