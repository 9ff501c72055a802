//! Mock payment provider for testing.
//!
//! Keeps agreements and charges in memory so handler tests can script the
//! provider side of a scenario. Supports:
//! - Seeding subscriptions and payments
//! - Error injection per method or for the next call
//! - Call tracking

use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};

use async_trait::async_trait;

use crate::domain::billing::{ProviderPaymentStatus, ProviderSubscriptionStatus};
use crate::domain::foundation::Money;
use crate::ports::{
    CreateSubscriptionRequest, CreatedSubscription, PaymentError, PaymentProvider,
    ProviderPayment, ProviderSubscription, SubscriptionStatusChange, SubscriptionUpdate,
};

/// Mock payment provider for testing.
///
/// ```ignore
/// let provider = MockPaymentProvider::new();
/// provider.add_subscription("pre_1", ProviderSubscriptionStatus::Authorized, Money::from_cents(10_000));
/// provider.set_method_error("update_subscription", PaymentError::network("down"));
/// ```
#[derive(Default)]
pub struct MockPaymentProvider {
    inner: Arc<Mutex<MockState>>,
}

#[derive(Default)]
struct MockState {
    subscriptions: HashMap<String, ProviderSubscription>,
    payments: HashMap<String, ProviderPayment>,
    created: u32,
    next_error: Option<PaymentError>,
    method_errors: HashMap<String, PaymentError>,
    call_log: Vec<MethodCall>,
}

/// Recorded method call for assertions.
#[derive(Debug, Clone)]
pub struct MethodCall {
    pub method: String,
    pub args: Vec<String>,
}

impl MockPaymentProvider {
    pub fn new() -> Self {
        Self::default()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Configuration Methods
    // ════════════════════════════════════════════════════════════════════════════

    /// Seeds an agreement the provider knows about.
    pub fn add_subscription(&self, id: &str, status: ProviderSubscriptionStatus, amount: Money) {
        self.state().subscriptions.insert(
            id.to_string(),
            ProviderSubscription {
                id: id.to_string(),
                status,
                recurring_amount: amount,
                frequency: 1,
                frequency_unit: "months".to_string(),
            },
        );
    }

    /// Seeds a charge the provider knows about.
    pub fn add_payment(&self, payment: ProviderPayment) {
        self.state().payments.insert(payment.id.clone(), payment);
    }

    /// Convenience for a recurring charge on an agreement.
    pub fn add_recurring_payment(&self, id: &str, preapproval_id: &str, amount: Money, status: &str) {
        self.add_payment(ProviderPayment {
            id: id.to_string(),
            amount,
            status: ProviderPaymentStatus::from_provider(status),
            method_id: "visa".to_string(),
            preapproval_id: Some(preapproval_id.to_string()),
        });
    }

    /// Current provider view of an agreement.
    pub fn subscription(&self, id: &str) -> Option<ProviderSubscription> {
        self.state().subscriptions.get(id).cloned()
    }

    /// Fails the next call to any method.
    pub fn set_error(&self, error: PaymentError) {
        self.state().next_error = Some(error);
    }

    /// Fails every call to `method` until cleared.
    pub fn set_method_error(&self, method: &str, error: PaymentError) {
        self.state().method_errors.insert(method.to_string(), error);
    }

    pub fn clear_errors(&self) {
        let mut state = self.state();
        state.next_error = None;
        state.method_errors.clear();
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Call Tracking
    // ════════════════════════════════════════════════════════════════════════════

    pub fn calls(&self) -> Vec<MethodCall> {
        self.state().call_log.clone()
    }

    pub fn was_called(&self, method: &str) -> bool {
        self.state().call_log.iter().any(|c| c.method == method)
    }

    pub fn call_count(&self, method: &str) -> usize {
        self.state()
            .call_log
            .iter()
            .filter(|c| c.method == method)
            .count()
    }

    // ════════════════════════════════════════════════════════════════════════════
    // Internal Helpers
    // ════════════════════════════════════════════════════════════════════════════

    fn state(&self) -> MutexGuard<'_, MockState> {
        self.inner.lock().unwrap_or_else(PoisonError::into_inner)
    }

    fn record_call(&self, method: &str, args: Vec<String>) {
        self.state().call_log.push(MethodCall {
            method: method.to_string(),
            args,
        });
    }

    fn check_error(&self, method: &str) -> Result<(), PaymentError> {
        let mut state = self.state();

        if let Some(error) = state.method_errors.get(method) {
            return Err(error.clone());
        }

        if let Some(error) = state.next_error.take() {
            return Err(error);
        }

        Ok(())
    }
}

impl Clone for MockPaymentProvider {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

#[async_trait]
impl PaymentProvider for MockPaymentProvider {
    async fn create_subscription(
        &self,
        request: CreateSubscriptionRequest,
    ) -> Result<CreatedSubscription, PaymentError> {
        self.record_call(
            "create_subscription",
            vec![
                request.reason.clone(),
                request.amount.to_string(),
                request.payer_email.clone(),
            ],
        );
        self.check_error("create_subscription")?;

        let mut state = self.state();
        state.created += 1;
        let id = format!("preapproval_mock_{}", state.created);
        state.subscriptions.insert(
            id.clone(),
            ProviderSubscription {
                id: id.clone(),
                status: ProviderSubscriptionStatus::Pending,
                recurring_amount: request.amount,
                frequency: request.frequency_months,
                frequency_unit: "months".to_string(),
            },
        );

        Ok(CreatedSubscription {
            init_point: format!("https://mock.mercadopago.test/checkout/{}", id),
            id,
        })
    }

    async fn update_subscription(
        &self,
        subscription_id: &str,
        update: SubscriptionUpdate,
    ) -> Result<(), PaymentError> {
        self.record_call(
            "update_subscription",
            vec![subscription_id.to_string(), format!("{:?}", update)],
        );
        self.check_error("update_subscription")?;

        let mut state = self.state();
        let subscription = state
            .subscriptions
            .get_mut(subscription_id)
            .ok_or_else(|| PaymentError::not_found("Subscription"))?;

        if let Some(status) = update.status {
            subscription.status = match status {
                SubscriptionStatusChange::Authorized => ProviderSubscriptionStatus::Authorized,
                SubscriptionStatusChange::Paused => ProviderSubscriptionStatus::Paused,
                SubscriptionStatusChange::Cancelled => ProviderSubscriptionStatus::Cancelled,
            };
        }
        if let Some(amount) = update.amount {
            subscription.recurring_amount = amount;
        }
        Ok(())
    }

    async fn get_subscription(
        &self,
        subscription_id: &str,
    ) -> Result<ProviderSubscription, PaymentError> {
        self.record_call("get_subscription", vec![subscription_id.to_string()]);
        self.check_error("get_subscription")?;

        self.state()
            .subscriptions
            .get(subscription_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Subscription"))
    }

    async fn get_payment(&self, payment_id: &str) -> Result<ProviderPayment, PaymentError> {
        self.record_call("get_payment", vec![payment_id.to_string()]);
        self.check_error("get_payment")?;

        self.state()
            .payments
            .get(payment_id)
            .cloned()
            .ok_or_else(|| PaymentError::not_found("Payment"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> CreateSubscriptionRequest {
        CreateSubscriptionRequest {
            reason: "Subscription basic - OdontoCare".to_string(),
            amount: Money::from_cents(10_000),
            currency: "ARS".to_string(),
            frequency_months: 1,
            payer_email: "a@b.com".to_string(),
            back_url: "https://app.test".to_string(),
        }
    }

    #[tokio::test]
    async fn created_subscription_starts_pending() {
        let provider = MockPaymentProvider::new();
        let created = provider.create_subscription(request()).await.unwrap();

        let stored = provider.subscription(&created.id).unwrap();
        assert_eq!(stored.status, ProviderSubscriptionStatus::Pending);
        assert_eq!(stored.recurring_amount, Money::from_cents(10_000));
        assert!(created.init_point.contains(&created.id));
    }

    #[tokio::test]
    async fn update_applies_status_and_amount() {
        let provider = MockPaymentProvider::new();
        provider.add_subscription("pre_1", ProviderSubscriptionStatus::Authorized, Money::from_cents(1));

        provider
            .update_subscription("pre_1", SubscriptionUpdate::status(SubscriptionStatusChange::Paused))
            .await
            .unwrap();
        provider
            .update_subscription("pre_1", SubscriptionUpdate::amount(Money::from_cents(500)))
            .await
            .unwrap();

        let stored = provider.subscription("pre_1").unwrap();
        assert_eq!(stored.status, ProviderSubscriptionStatus::Paused);
        assert_eq!(stored.recurring_amount, Money::from_cents(500));
    }

    #[tokio::test]
    async fn unknown_ids_are_not_found() {
        let provider = MockPaymentProvider::new();
        let err = provider.get_payment("missing").await.unwrap_err();
        assert_eq!(err.code, crate::ports::PaymentErrorCode::NotFound);
    }

    #[tokio::test]
    async fn method_error_persists_and_next_error_is_consumed() {
        let provider = MockPaymentProvider::new();
        provider.set_method_error("get_subscription", PaymentError::network("down"));
        assert!(provider.get_subscription("x").await.is_err());
        assert!(provider.get_subscription("x").await.is_err());

        provider.clear_errors();
        provider.set_error(PaymentError::network("blip"));
        assert!(provider.create_subscription(request()).await.is_err());
        assert!(provider.create_subscription(request()).await.is_ok());
    }

    #[tokio::test]
    async fn calls_are_tracked() {
        let provider = MockPaymentProvider::new();
        let _ = provider.get_payment("p1").await;
        assert!(provider.was_called("get_payment"));
        assert_eq!(provider.call_count("get_payment"), 1);
        assert_eq!(provider.calls()[0].args, vec!["p1".to_string()]);
    }
}
