//! ReconcileOverduePaymentsHandler - flags overdue clients and suspends the
//! ones past the grace period.
//!
//! Provider calls made here are best effort: a failed poll falls back to the
//! local rules, and a failed pause request does not undo the suspension.

use std::sync::Arc;

use serde::Serialize;

use crate::domain::billing::{BillingError, Client, OverdueOutcome, OverduePolicy};
use crate::domain::foundation::Timestamp;
use crate::ports::{
    ClientRepository, PaymentProvider, SubscriptionStatusChange, SubscriptionUpdate,
};

/// Command to run overdue processing as of a given instant.
#[derive(Debug, Clone, Copy)]
pub struct ReconcileOverduePaymentsCommand {
    /// Reference time for the run, normally now.
    pub as_of: Timestamp,
}

impl Default for ReconcileOverduePaymentsCommand {
    fn default() -> Self {
        Self {
            as_of: Timestamp::now(),
        }
    }
}

/// Counts from one reconciliation run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationSummary {
    pub examined: usize,
    pub marked_overdue: usize,
    pub suspended: usize,
    pub failed: usize,
}

/// Handler for daily overdue reconciliation.
///
/// Clients past due are flagged overdue. Once the grace period runs
/// out they are suspended and their agreement is paused at the provider.
/// A failure on one client is logged and the run continues.
pub struct ReconcileOverduePaymentsHandler {
    clients: Arc<dyn ClientRepository>,
    provider: Arc<dyn PaymentProvider>,
    policy: OverduePolicy,
}

impl ReconcileOverduePaymentsHandler {
    pub fn new(
        clients: Arc<dyn ClientRepository>,
        provider: Arc<dyn PaymentProvider>,
        policy: OverduePolicy,
    ) -> Self {
        Self {
            clients,
            provider,
            policy,
        }
    }

    pub async fn handle(
        &self,
        cmd: ReconcileOverduePaymentsCommand,
    ) -> Result<ReconciliationSummary, BillingError> {
        let candidates = self.clients.find_overdue_candidates(cmd.as_of).await?;
        let mut summary = ReconciliationSummary {
            examined: candidates.len(),
            ..Default::default()
        };

        for client in candidates {
            let client_id = client.id;
            match self.reconcile_client(client, cmd.as_of).await {
                Ok(outcome) => {
                    summary.marked_overdue += 1;
                    if outcome.suspended {
                        summary.suspended += 1;
                    }
                }
                Err(e) => {
                    summary.failed += 1;
                    tracing::error!(client_id = %client_id, error = %e, "Overdue reconciliation failed");
                }
            }
        }

        tracing::info!(
            examined = summary.examined,
            marked_overdue = summary.marked_overdue,
            suspended = summary.suspended,
            failed = summary.failed,
            "Overdue reconciliation finished"
        );
        Ok(summary)
    }

    async fn reconcile_client(
        &self,
        mut client: Client,
        now: Timestamp,
    ) -> Result<OverdueOutcome, BillingError> {
        let polled = match client.subscription_id.as_deref() {
            Some(subscription_id) => match self.provider.get_subscription(subscription_id).await {
                Ok(remote) => Some(remote.status),
                Err(e) => {
                    tracing::warn!(
                        client_id = %client.id,
                        subscription_id = %subscription_id,
                        error = %e,
                        "Provider poll failed, using local state"
                    );
                    None
                }
            },
            None => None,
        };

        let outcome = self.policy.apply(&mut client, polled, now);

        if outcome.pause_subscription {
            if let Some(subscription_id) = client.subscription_id.as_deref() {
                if let Err(e) = self
                    .provider
                    .update_subscription(
                        subscription_id,
                        SubscriptionUpdate::status(SubscriptionStatusChange::Paused),
                    )
                    .await
                {
                    tracing::warn!(
                        client_id = %client.id,
                        subscription_id = %subscription_id,
                        error = %e,
                        "Could not pause subscription, keeping local suspension"
                    );
                }
            }
        }

        self.clients.update(&client).await?;

        if outcome.suspended {
            tracing::info!(
                client_id = %client.id,
                days_overdue = outcome.days_overdue,
                "Client suspended for non-payment"
            );
        }
        Ok(outcome)
    }
}
