//! Rules shared by the scheduled reconciliation and the provider webhook.
//!
//! Both entry points feed provider states through [`status_for_provider`],
//! so a poll and a push carrying the same provider status always leave the
//! client in the same lifecycle state.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{Client, ClientStatus, ProviderSubscriptionStatus};

pub const DEFAULT_GRACE_PERIOD_DAYS: i64 = 5;
pub const DEFAULT_REMINDER_WINDOW_DAYS: i64 = 3;

/// Client state implied by a provider subscription status.
///
/// `None` means the status carries no lifecycle change.
pub fn status_for_provider(status: ProviderSubscriptionStatus) -> Option<ClientStatus> {
    match status {
        ProviderSubscriptionStatus::Authorized => Some(ClientStatus::Active),
        ProviderSubscriptionStatus::Paused => Some(ClientStatus::Suspended),
        ProviderSubscriptionStatus::Cancelled => Some(ClientStatus::Inactive),
        ProviderSubscriptionStatus::Pending | ProviderSubscriptionStatus::Unknown => None,
    }
}

/// How long an overdue client stays active before suspension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverduePolicy {
    pub grace_period_days: i64,
}

impl Default for OverduePolicy {
    fn default() -> Self {
        Self {
            grace_period_days: DEFAULT_GRACE_PERIOD_DAYS,
        }
    }
}

/// What one overdue pass did to a client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct OverdueOutcome {
    pub days_overdue: i64,

    /// Suspended because the grace period ran out.
    pub suspended: bool,

    /// The provider agreement should be paused to match.
    pub pause_subscription: bool,
}

impl OverduePolicy {
    pub fn new(grace_period_days: i64) -> Self {
        Self { grace_period_days }
    }

    /// Applies one overdue pass to a client whose due date has passed.
    ///
    /// `polled` is the provider status fetched for this run, if any.
    pub fn apply(
        &self,
        client: &mut Client,
        polled: Option<ProviderSubscriptionStatus>,
        now: Timestamp,
    ) -> OverdueOutcome {
        if let Some(polled) = polled {
            client.apply_provider_status(polled, now);
        }

        client.mark_overdue(now);

        let days_overdue = client
            .next_payment_due
            .map(|due| now.whole_days_since(&due))
            .unwrap_or(0);

        let mut outcome = OverdueOutcome {
            days_overdue,
            ..Default::default()
        };

        if days_overdue > self.grace_period_days && client.status == ClientStatus::Active {
            client.suspend(now);
            outcome.suspended = true;
            outcome.pause_subscription = client.subscription_id.is_some();
        }

        outcome
    }
}

/// Look-ahead for payment reminders.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReminderWindow {
    pub days: i64,
}

impl Default for ReminderWindow {
    fn default() -> Self {
        Self {
            days: DEFAULT_REMINDER_WINDOW_DAYS,
        }
    }
}

impl ReminderWindow {
    pub fn new(days: i64) -> Self {
        Self { days }
    }

    /// Inclusive `[as_of, as_of + days]` bounds.
    pub fn bounds(&self, as_of: Timestamp) -> (Timestamp, Timestamp) {
        (as_of, as_of.add_days(self.days))
    }
}
