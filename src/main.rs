//! Client Billing server binary.
//!
//! Pass `--in-memory` to ignore any database configuration.

use std::error::Error;
use std::sync::Arc;

use secrecy::ExposeSecret;
use tokio::net::TcpListener;
use tower_http::timeout::TimeoutLayer;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use client_billing::adapters::http::{billing_router, BillingAppState};
use client_billing::adapters::mercadopago::WebhookSignatureVerifier;
use client_billing::adapters::scheduler::{
    BillingScheduler, DailyJob, ReconcileOverdueJob, SendRemindersJob,
};
use client_billing::adapters::{
    InMemoryClientRepository, InMemoryInvoiceRepository, InMemoryPaymentRepository,
    LoggingReminderNotifier, MercadoPagoAdapter, MercadoPagoConfig, PostgresClientRepository,
    PostgresInvoiceRepository, PostgresPaymentRepository,
};
use client_billing::application::{
    ReconcileOverduePaymentsHandler, SendPaymentRemindersHandler, SubscriptionSettings,
};
use client_billing::config::AppConfig;
use client_billing::ports::{ClientRepository, InvoiceRepository, PaymentRepository};

type BoxError = Box<dyn Error + Send + Sync>;

struct Repositories {
    clients: Arc<dyn ClientRepository>,
    payments: Arc<dyn PaymentRepository>,
    invoices: Arc<dyn InvoiceRepository>,
}

#[tokio::main]
async fn main() -> Result<(), BoxError> {
    let config = AppConfig::load()?;
    config.validate()?;

    init_tracing(&config.server.log_filter, config.is_production());

    let in_memory = std::env::args().any(|arg| arg == "--in-memory");
    let repos = build_repositories(&config, in_memory).await?;

    let payment = &config.payment;
    let provider = Arc::new(MercadoPagoAdapter::new(
        MercadoPagoConfig::new(payment.access_token.expose_secret().clone())
            .with_base_url(payment.api_base_url.clone()),
    ));
    if payment.is_test_mode() {
        tracing::warn!("MercadoPago running with sandbox credentials");
    }

    let mut state = BillingAppState::new(
        repos.clients.clone(),
        repos.payments.clone(),
        repos.invoices.clone(),
        provider.clone(),
    )
    .with_subscription_settings(SubscriptionSettings {
        currency: payment.currency.clone(),
        back_url: payment.back_url.clone(),
    });
    match &payment.webhook_secret {
        Some(secret) => {
            state = state.with_webhook_verifier(WebhookSignatureVerifier::new(
                secret.expose_secret().clone(),
            ));
        }
        None => tracing::warn!("Webhook signature verification disabled"),
    }

    let mut scheduler = None;
    if config.billing.scheduler_enabled {
        let reconcile: Arc<dyn DailyJob> = Arc::new(ReconcileOverdueJob(
            ReconcileOverduePaymentsHandler::new(
                repos.clients.clone(),
                provider.clone(),
                config.billing.overdue_policy(),
            ),
        ));
        let reminders: Arc<dyn DailyJob> =
            Arc::new(SendRemindersJob(SendPaymentRemindersHandler::new(
                repos.clients.clone(),
                Arc::new(LoggingReminderNotifier::new()),
                config.billing.reminder_window(),
            )));

        let jobs = BillingScheduler::new().await?;
        jobs.add_daily(reconcile, config.billing.reconcile_time()?)
            .await?;
        jobs.add_daily(reminders, config.billing.reminders_time()?)
            .await?;
        jobs.start().await?;
        scheduler = Some(jobs);
    }

    let router = billing_router(state, &config.server.allowed_origins())
        .layer(TimeoutLayer::new(config.server.request_timeout()));

    let addr = config.server.socket_addr()?;
    let listener = TcpListener::bind(addr).await?;
    tracing::info!(%addr, "Client billing listening");

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(mut scheduler) = scheduler {
        scheduler.shutdown().await?;
    }
    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(log_filter: &str, json: bool) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(log_filter));

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }
}

async fn build_repositories(config: &AppConfig, in_memory: bool) -> Result<Repositories, BoxError> {
    let database = match &config.database {
        Some(database) if !in_memory => database,
        _ => {
            tracing::warn!("No database configured, using in-memory store");
            return Ok(Repositories {
                clients: Arc::new(InMemoryClientRepository::new()),
                payments: Arc::new(InMemoryPaymentRepository::new()),
                invoices: Arc::new(InMemoryInvoiceRepository::new()),
            });
        }
    };

    let pool = database.connect().await?;
    if database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    Ok(Repositories {
        clients: Arc::new(PostgresClientRepository::new(pool.clone())),
        payments: Arc::new(PostgresPaymentRepository::new(pool.clone())),
        invoices: Arc::new(PostgresInvoiceRepository::new(pool)),
    })
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
