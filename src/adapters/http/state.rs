//! Shared application state for the billing API.

use std::sync::Arc;

use crate::adapters::mercadopago::WebhookSignatureVerifier;
use crate::application::handlers::{
    CancelSubscriptionHandler, CreateClientHandler, CreateSubscriptionHandler,
    DeleteClientHandler, GetClientHandler, GetSubscriptionStatusHandler,
    HandleProviderWebhookHandler, IssueInvoiceHandler, ListClientsHandler, ListInvoicesHandler,
    ListPaymentsHandler, ReactivateSubscriptionHandler, RegisterManualPaymentHandler,
    SetPaymentStatusHandler, SubscriptionSettings, UpdateAvailablePlansHandler,
    UpdateClientHandler, UpdateSubscriptionHandler, VoidInvoiceHandler,
};
use crate::ports::{ClientRepository, InvoiceRepository, PaymentProvider, PaymentRepository};

/// Cloned for each request; every dependency is behind an `Arc`.
#[derive(Clone)]
pub struct BillingAppState {
    pub clients: Arc<dyn ClientRepository>,
    pub payments: Arc<dyn PaymentRepository>,
    pub invoices: Arc<dyn InvoiceRepository>,
    pub provider: Arc<dyn PaymentProvider>,
    pub subscription_settings: SubscriptionSettings,
    /// Present only when a webhook secret is configured.
    pub webhook_verifier: Option<Arc<WebhookSignatureVerifier>>,
}

impl BillingAppState {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        payments: Arc<dyn PaymentRepository>,
        invoices: Arc<dyn InvoiceRepository>,
        provider: Arc<dyn PaymentProvider>,
    ) -> Self {
        Self {
            clients,
            payments,
            invoices,
            provider,
            subscription_settings: SubscriptionSettings::default(),
            webhook_verifier: None,
        }
    }

    pub fn with_subscription_settings(mut self, settings: SubscriptionSettings) -> Self {
        self.subscription_settings = settings;
        self
    }

    pub fn with_webhook_verifier(mut self, verifier: WebhookSignatureVerifier) -> Self {
        self.webhook_verifier = Some(Arc::new(verifier));
        self
    }

    // Clients

    pub fn create_client_handler(&self) -> CreateClientHandler {
        CreateClientHandler::new(self.clients.clone())
    }

    pub fn get_client_handler(&self) -> GetClientHandler {
        GetClientHandler::new(self.clients.clone())
    }

    pub fn list_clients_handler(&self) -> ListClientsHandler {
        ListClientsHandler::new(self.clients.clone())
    }

    pub fn update_client_handler(&self) -> UpdateClientHandler {
        UpdateClientHandler::new(self.clients.clone())
    }

    pub fn update_available_plans_handler(&self) -> UpdateAvailablePlansHandler {
        UpdateAvailablePlansHandler::new(self.clients.clone())
    }

    pub fn delete_client_handler(&self) -> DeleteClientHandler {
        DeleteClientHandler::new(
            self.clients.clone(),
            self.payments.clone(),
            self.invoices.clone(),
        )
    }

    // Subscriptions

    pub fn create_subscription_handler(&self) -> CreateSubscriptionHandler {
        CreateSubscriptionHandler::new(
            self.clients.clone(),
            self.provider.clone(),
            self.subscription_settings.clone(),
        )
    }

    pub fn cancel_subscription_handler(&self) -> CancelSubscriptionHandler {
        CancelSubscriptionHandler::new(self.clients.clone(), self.provider.clone())
    }

    pub fn update_subscription_handler(&self) -> UpdateSubscriptionHandler {
        UpdateSubscriptionHandler::new(self.clients.clone(), self.provider.clone())
    }

    pub fn reactivate_subscription_handler(&self) -> ReactivateSubscriptionHandler {
        ReactivateSubscriptionHandler::new(self.clients.clone(), self.provider.clone())
    }

    pub fn subscription_status_handler(&self) -> GetSubscriptionStatusHandler {
        GetSubscriptionStatusHandler::new(self.clients.clone(), self.provider.clone())
    }

    // Payments

    pub fn register_payment_handler(&self) -> RegisterManualPaymentHandler {
        RegisterManualPaymentHandler::new(self.clients.clone(), self.payments.clone())
    }

    pub fn set_payment_status_handler(&self) -> SetPaymentStatusHandler {
        SetPaymentStatusHandler::new(self.clients.clone(), self.payments.clone())
    }

    pub fn list_payments_handler(&self) -> ListPaymentsHandler {
        ListPaymentsHandler::new(self.payments.clone())
    }

    // Invoices

    pub fn issue_invoice_handler(&self) -> IssueInvoiceHandler {
        IssueInvoiceHandler::new(
            self.clients.clone(),
            self.payments.clone(),
            self.invoices.clone(),
        )
    }

    pub fn void_invoice_handler(&self) -> VoidInvoiceHandler {
        VoidInvoiceHandler::new(self.invoices.clone())
    }

    pub fn list_invoices_handler(&self) -> ListInvoicesHandler {
        ListInvoicesHandler::new(self.invoices.clone())
    }

    // Webhooks

    pub fn webhook_handler(&self) -> HandleProviderWebhookHandler {
        HandleProviderWebhookHandler::new(
            self.clients.clone(),
            self.payments.clone(),
            self.provider.clone(),
        )
    }
}
