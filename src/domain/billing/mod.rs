//! Billing domain - clients, plans, payments, invoices and reconciliation rules.

mod client;
mod errors;
mod extra_charge;
mod invoice;
mod invoice_number;
mod payment;
mod plan;
mod provider;
mod reconciliation;
mod status;

pub use client::{Client, ClientChanges, NewClient};
pub use errors::{BillingError, Entity};
pub use extra_charge::{ExtraCharge, ExtraChargeStatus};
pub use invoice::{Invoice, InvoiceStatus, LineItem};
pub use invoice_number::InvoiceNumber;
pub use payment::{NewPayment, Payment, PaymentStatus};
pub use plan::{validate_catalog, CurrentPlan, Plan, PlanType, Program};
pub use provider::{ProviderPaymentStatus, ProviderSubscriptionStatus};
pub use reconciliation::{
    status_for_provider, OverdueOutcome, OverduePolicy, ReminderWindow,
    DEFAULT_GRACE_PERIOD_DAYS, DEFAULT_REMINDER_WINDOW_DAYS,
};
pub use status::{BillingStatus, ClientStatus};
