//! Daily billing jobs on a cron scheduler.
//!
//! Each job is registered with `tokio-cron-scheduler` under a six-field
//! cron expression (`sec min hour dom month dow`) built from a UTC `HH:MM`.
//! Job errors are logged and never unschedule the job.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{NaiveTime, Timelike};
use tokio_cron_scheduler::{Job, JobScheduler, JobSchedulerError};
use uuid::Uuid;

use crate::application::handlers::{
    ReconcileOverduePaymentsCommand, ReconcileOverduePaymentsHandler,
    SendPaymentRemindersCommand, SendPaymentRemindersHandler,
};
use crate::domain::billing::BillingError;
use crate::domain::foundation::Timestamp;

/// A unit of daily work.
#[async_trait]
pub trait DailyJob: Send + Sync {
    fn name(&self) -> &'static str;

    /// Runs the job as of `now` and returns a short report for the log.
    async fn run(&self, now: Timestamp) -> Result<String, BillingError>;
}

/// Overdue processing with the configured grace period.
pub struct ReconcileOverdueJob(pub ReconcileOverduePaymentsHandler);

#[async_trait]
impl DailyJob for ReconcileOverdueJob {
    fn name(&self) -> &'static str {
        "reconcile_overdue_payments"
    }

    async fn run(&self, now: Timestamp) -> Result<String, BillingError> {
        let summary = self
            .0
            .handle(ReconcileOverduePaymentsCommand { as_of: now })
            .await?;
        Ok(format!(
            "examined={} marked_overdue={} suspended={} failed={}",
            summary.examined, summary.marked_overdue, summary.suspended, summary.failed
        ))
    }
}

/// Reminders for clients due within the reminder window.
pub struct SendRemindersJob(pub SendPaymentRemindersHandler);

#[async_trait]
impl DailyJob for SendRemindersJob {
    fn name(&self) -> &'static str {
        "send_payment_reminders"
    }

    async fn run(&self, now: Timestamp) -> Result<String, BillingError> {
        let summary = self
            .0
            .handle(SendPaymentRemindersCommand { as_of: now })
            .await?;
        Ok(format!("sent={} failed={}", summary.sent, summary.failed))
    }
}

/// Cron expression firing every day at `at` UTC.
pub fn daily_cron(at: NaiveTime) -> String {
    format!("0 {} {} * * *", at.minute(), at.hour())
}

/// Runs `job` once and logs the outcome. Returns `false` on failure.
pub async fn run_job(job: &dyn DailyJob, now: Timestamp) -> bool {
    let started = std::time::Instant::now();
    match job.run(now).await {
        Ok(report) => {
            tracing::info!(
                job = job.name(),
                elapsed_ms = started.elapsed().as_millis() as u64,
                report = %report,
                "Daily job finished"
            );
            true
        }
        Err(e) => {
            tracing::error!(job = job.name(), error = %e, "Daily job failed");
            false
        }
    }
}

/// Owns the cron scheduler that fires the billing jobs.
pub struct BillingScheduler {
    scheduler: JobScheduler,
}

impl BillingScheduler {
    pub async fn new() -> Result<Self, JobSchedulerError> {
        Ok(Self {
            scheduler: JobScheduler::new().await?,
        })
    }

    /// Registers `job` to fire every day at `at` UTC.
    pub async fn add_daily(
        &self,
        job: Arc<dyn DailyJob>,
        at: NaiveTime,
    ) -> Result<Uuid, JobSchedulerError> {
        let name = job.name();
        let cron = daily_cron(at);
        let id = self
            .scheduler
            .add(Job::new_async(cron.as_str(), move |_uuid, _l| {
                let job = job.clone();
                Box::pin(async move {
                    run_job(job.as_ref(), Timestamp::now()).await;
                })
            })?)
            .await?;
        tracing::info!(job = name, cron = %cron, "Daily job scheduled");
        Ok(id)
    }

    /// Next UTC instant the job fires, if it is still registered.
    pub async fn next_run(&mut self, id: Uuid) -> Result<Option<Timestamp>, JobSchedulerError> {
        Ok(self
            .scheduler
            .next_tick_for_job(id)
            .await?
            .map(Timestamp::from_datetime))
    }

    pub async fn start(&self) -> Result<(), JobSchedulerError> {
        self.scheduler.start().await
    }

    /// Stops firing jobs. A job already running is allowed to finish.
    pub async fn shutdown(&mut self) -> Result<(), JobSchedulerError> {
        self.scheduler.shutdown().await?;
        tracing::info!("Billing scheduler stopped");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use crate::adapters::mercadopago::MockPaymentProvider;
    use crate::adapters::memory::InMemoryClientRepository;
    use crate::domain::billing::OverduePolicy;

    struct CountingJob {
        runs: AtomicUsize,
        fail: bool,
    }

    impl CountingJob {
        fn new(fail: bool) -> Self {
            Self {
                runs: AtomicUsize::new(0),
                fail,
            }
        }
    }

    #[async_trait]
    impl DailyJob for CountingJob {
        fn name(&self) -> &'static str {
            "counting"
        }

        async fn run(&self, _now: Timestamp) -> Result<String, BillingError> {
            self.runs.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(BillingError::unexpected("store unavailable"))
            } else {
                Ok("ok".to_string())
            }
        }
    }

    fn at(hour: u32, minute: u32) -> NaiveTime {
        NaiveTime::from_hms_opt(hour, minute, 0).unwrap()
    }

    // ════════════════════════════════════════════════════════════════════════
    // Cron expressions
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn daily_cron_uses_minute_then_hour() {
        assert_eq!(daily_cron(at(0, 5)), "0 5 0 * * *");
        assert_eq!(daily_cron(at(10, 0)), "0 0 10 * * *");
        assert_eq!(daily_cron(at(23, 59)), "0 59 23 * * *");
    }

    // ════════════════════════════════════════════════════════════════════════
    // Scheduler
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn registered_job_next_fires_at_configured_time() {
        let mut scheduler = BillingScheduler::new().await.unwrap();
        let id = scheduler
            .add_daily(Arc::new(CountingJob::new(false)), at(0, 5))
            .await
            .unwrap();

        let next = scheduler.next_run(id).await.unwrap().unwrap();
        let next = next.as_datetime();

        assert_eq!((next.hour(), next.minute(), next.second()), (0, 5, 0));
        assert!(next > &chrono::Utc::now());
    }

    #[tokio::test]
    async fn scheduler_starts_and_shuts_down() {
        let mut scheduler = BillingScheduler::new().await.unwrap();
        scheduler
            .add_daily(Arc::new(CountingJob::new(false)), at(10, 0))
            .await
            .unwrap();

        scheduler.start().await.unwrap();
        scheduler.shutdown().await.unwrap();
    }

    #[test]
    fn invalid_cron_is_rejected() {
        let job = Job::new_async("0 61 25 * * *", |_uuid, _l| Box::pin(async {}));
        assert!(job.is_err());
    }

    // ════════════════════════════════════════════════════════════════════════
    // Job execution
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn run_job_reports_failure_without_panicking() {
        let job = CountingJob::new(true);

        assert!(!run_job(&job, Timestamp::now()).await);
        assert_eq!(job.runs.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn reconcile_job_runs_handler_over_empty_store() {
        let handler = ReconcileOverduePaymentsHandler::new(
            Arc::new(InMemoryClientRepository::new()),
            Arc::new(MockPaymentProvider::new()),
            OverduePolicy::default(),
        );
        let job = ReconcileOverdueJob(handler);

        assert!(run_job(&job, Timestamp::now()).await);
        assert_eq!(job.name(), "reconcile_overdue_payments");
    }
}
