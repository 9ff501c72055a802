//! Subscription lifecycle handlers.
//!
//! Every mutating handler calls the payment provider before persisting, so a
//! provider failure leaves the client untouched.

mod cancel_subscription;
mod create_subscription;
mod get_subscription_status;
mod reactivate_subscription;
mod update_subscription;

pub use cancel_subscription::{CancelSubscriptionCommand, CancelSubscriptionHandler};
pub use create_subscription::{
    CreateSubscriptionCommand, CreateSubscriptionHandler, CreateSubscriptionResult,
    SubscriptionSettings,
};
pub use get_subscription_status::{
    GetSubscriptionStatusHandler, GetSubscriptionStatusQuery, SubscriptionStatusView,
};
pub use reactivate_subscription::{ReactivateSubscriptionCommand, ReactivateSubscriptionHandler};
pub use update_subscription::{UpdateSubscriptionCommand, UpdateSubscriptionHandler};
