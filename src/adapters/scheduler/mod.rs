//! Scheduler adapter - runs the reconciliation jobs once a day.

mod daily_jobs;

pub use daily_jobs::{
    daily_cron, run_job, BillingScheduler, DailyJob, ReconcileOverdueJob, SendRemindersJob,
};
