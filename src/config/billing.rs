//! Billing rules and job schedule configuration

use chrono::NaiveTime;
use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::billing::{
    OverduePolicy, ReminderWindow, DEFAULT_GRACE_PERIOD_DAYS, DEFAULT_REMINDER_WINDOW_DAYS,
};

#[derive(Debug, Clone, Deserialize)]
pub struct BillingConfig {
    /// Days an overdue client stays active before suspension
    #[serde(default = "default_grace_period")]
    pub grace_period_days: i64,

    /// How far ahead reminders look for upcoming due dates
    #[serde(default = "default_reminder_window")]
    pub reminder_window_days: i64,

    /// UTC `HH:MM` for overdue reconciliation
    #[serde(default = "default_reconcile_at")]
    pub reconcile_at: String,

    /// UTC `HH:MM` for payment reminders
    #[serde(default = "default_reminders_at")]
    pub reminders_at: String,

    #[serde(default = "default_scheduler_enabled")]
    pub scheduler_enabled: bool,
}

impl BillingConfig {
    pub fn overdue_policy(&self) -> OverduePolicy {
        OverduePolicy::new(self.grace_period_days)
    }

    pub fn reminder_window(&self) -> ReminderWindow {
        ReminderWindow::new(self.reminder_window_days)
    }

    pub fn reconcile_time(&self) -> Result<NaiveTime, ValidationError> {
        parse_time(&self.reconcile_at)
    }

    pub fn reminders_time(&self) -> Result<NaiveTime, ValidationError> {
        parse_time(&self.reminders_at)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(0..=60).contains(&self.grace_period_days) {
            return Err(ValidationError::InvalidGracePeriod);
        }
        if !(1..=30).contains(&self.reminder_window_days) {
            return Err(ValidationError::InvalidReminderWindow);
        }
        self.reconcile_time()?;
        self.reminders_time()?;
        Ok(())
    }
}

impl Default for BillingConfig {
    fn default() -> Self {
        Self {
            grace_period_days: default_grace_period(),
            reminder_window_days: default_reminder_window(),
            reconcile_at: default_reconcile_at(),
            reminders_at: default_reminders_at(),
            scheduler_enabled: default_scheduler_enabled(),
        }
    }
}

fn parse_time(value: &str) -> Result<NaiveTime, ValidationError> {
    NaiveTime::parse_from_str(value, "%H:%M")
        .map_err(|_| ValidationError::InvalidScheduleTime(value.to_string()))
}

fn default_grace_period() -> i64 {
    DEFAULT_GRACE_PERIOD_DAYS
}

fn default_reminder_window() -> i64 {
    DEFAULT_REMINDER_WINDOW_DAYS
}

fn default_reconcile_at() -> String {
    "00:05".to_string()
}

fn default_reminders_at() -> String {
    "10:00".to_string()
}

fn default_scheduler_enabled() -> bool {
    true
}
