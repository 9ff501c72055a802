//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations. Each
//! handler receives its ports as `Arc<dyn Trait>` and returns
//! `Result<_, BillingError>`.

pub mod client;
pub mod invoice;
pub mod payment;
pub mod reconciliation;
pub mod subscription;
pub mod webhook;

#[cfg(test)]
mod test_support;

pub use client::{
    CreateClientCommand, CreateClientHandler, DeleteClientCommand, DeleteClientHandler,
    GetClientHandler, GetClientQuery, ListClientsHandler, UpdateAvailablePlansCommand,
    UpdateAvailablePlansHandler, UpdateClientCommand, UpdateClientHandler,
};
pub use invoice::{
    IssueInvoiceCommand, IssueInvoiceHandler, ListInvoicesHandler, ListInvoicesQuery,
    VoidInvoiceCommand, VoidInvoiceHandler,
};
pub use payment::{
    ListPaymentsHandler, ListPaymentsQuery, RegisterManualPaymentCommand,
    RegisterManualPaymentHandler, SetPaymentStatusCommand, SetPaymentStatusHandler,
};
pub use reconciliation::{
    ReconcileOverduePaymentsCommand, ReconcileOverduePaymentsHandler, ReconciliationSummary,
    ReminderSummary, SendPaymentRemindersCommand, SendPaymentRemindersHandler,
};
pub use subscription::{
    CancelSubscriptionCommand, CancelSubscriptionHandler, CreateSubscriptionCommand,
    CreateSubscriptionHandler, CreateSubscriptionResult, GetSubscriptionStatusHandler,
    GetSubscriptionStatusQuery, ReactivateSubscriptionCommand, ReactivateSubscriptionHandler,
    SubscriptionSettings, SubscriptionStatusView, UpdateSubscriptionCommand,
    UpdateSubscriptionHandler,
};
pub use webhook::{HandleProviderWebhookCommand, HandleProviderWebhookHandler, WebhookOutcome};
