//! Client aggregate.
//!
//! The client is the aggregate root for billing status: it owns its plan
//! catalog, the active plan, the provider subscription id and the
//! payment-standing fields that reconciliation keeps in sync.
//!
//! # Invariants
//!
//! - `available_plans` is non-empty, prices are positive, one entry per type
//! - `current_plan.plan_type`, when set, is listed in `available_plans`
//! - `subscription_id` is never cleared once a subscription was created

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{ClientId, ExtraChargeId, Money, Timestamp, ValidationError};

use super::plan::validate_catalog;
use super::reconciliation::status_for_provider;
use super::{
    BillingError, BillingStatus, ClientStatus, CurrentPlan, Plan, PlanType, Program,
    ProviderSubscriptionStatus,
};

/// Input for registering a new client.
#[derive(Debug, Clone)]
pub struct NewClient {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub program: Program,
    pub available_plans: Vec<Plan>,
}

/// Contact fields an operator may edit. `None` leaves the field untouched.
#[derive(Debug, Clone, Default)]
pub struct ClientChanges {
    pub name: Option<String>,
    pub email: Option<String>,
    pub phone: Option<String>,
    pub program: Option<Program>,
    pub status: Option<ClientStatus>,
}

/// A billed subscriber.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Client {
    pub id: ClientId,
    pub name: String,
    pub email: String,
    pub phone: String,

    /// Product the client acquired.
    pub program: Program,

    /// When the client relationship started.
    pub started_at: Timestamp,

    pub status: ClientStatus,

    /// Client-specific plan catalog.
    pub available_plans: Vec<Plan>,

    /// Plan currently billed. `None` until the first subscription.
    pub current_plan: Option<CurrentPlan>,

    pub monthly_actual_spend: Money,

    /// Extra charges billed to this client outside the plan.
    pub extra_charge_ids: Vec<ExtraChargeId>,

    /// Provider-side recurring agreement id.
    pub subscription_id: Option<String>,

    pub billing_status: BillingStatus,
    pub next_payment_due: Option<Timestamp>,
    pub last_payment_at: Option<Timestamp>,

    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Client {
    /// Registers a new, not yet subscribed client.
    pub fn create(new: NewClient, now: Timestamp) -> Result<Self, ValidationError> {
        let name = require_text("name", new.name)?;
        let email = validate_email(new.email)?;
        let phone = require_text("phone", new.phone)?;
        validate_catalog(&new.available_plans)?;

        Ok(Self {
            id: ClientId::new(),
            name,
            email,
            phone,
            program: new.program,
            started_at: now,
            status: ClientStatus::Inactive,
            available_plans: new.available_plans,
            current_plan: None,
            monthly_actual_spend: Money::zero(),
            extra_charge_ids: Vec::new(),
            subscription_id: None,
            billing_status: BillingStatus::Pending,
            next_payment_due: None,
            last_payment_at: None,
            created_at: now,
            updated_at: now,
        })
    }

    /// Looks up a plan in this client's catalog.
    pub fn find_plan(&self, plan_type: PlanType) -> Option<&Plan> {
        self.available_plans
            .iter()
            .find(|plan| plan.plan_type == plan_type)
    }

    /// Catalog entry or InvalidArgument when the client cannot buy it.
    pub fn require_plan(&self, plan_type: PlanType) -> Result<&Plan, BillingError> {
        self.find_plan(plan_type).ok_or_else(|| {
            BillingError::invalid_argument(
                "plan_type",
                format!("plan '{}' is not available for this client", plan_type),
            )
        })
    }

    /// Provider subscription id, or InvalidState when none was ever created.
    pub fn require_subscription(&self) -> Result<&str, BillingError> {
        self.subscription_id
            .as_deref()
            .ok_or_else(|| BillingError::invalid_state("client has no subscription"))
    }

    /// Records a freshly created provider subscription.
    pub fn subscribe(&mut self, subscription_id: String, plan: &Plan, now: Timestamp) {
        self.subscription_id = Some(subscription_id);
        self.status = ClientStatus::Active;
        self.billing_status = BillingStatus::Pending;
        self.next_payment_due = Some(now.add_months(1));
        self.current_plan = Some(CurrentPlan {
            plan_type: plan.plan_type,
            price: plan.price,
            activated_at: now,
        });
        self.updated_at = now;
    }

    /// Marks the subscription as cancelled. The subscription id is kept.
    pub fn mark_cancelled(&mut self, now: Timestamp) {
        self.set_status(ClientStatus::Inactive, now);
    }

    /// Moves to another catalog plan, optionally at a negotiated price.
    ///
    /// Returns the price the provider should now charge.
    pub fn switch_plan(
        &mut self,
        plan_type: PlanType,
        price_override: Option<Money>,
        now: Timestamp,
    ) -> Result<Money, BillingError> {
        let listed = self.require_plan(plan_type)?.price;
        let price = match price_override {
            Some(price) => price.ensure_positive("price")?,
            None => listed,
        };
        self.current_plan = Some(CurrentPlan {
            plan_type,
            price,
            activated_at: now,
        });
        self.updated_at = now;
        Ok(price)
    }

    /// Changes the price of the active plan in place.
    pub fn reprice_current_plan(
        &mut self,
        price: Money,
        now: Timestamp,
    ) -> Result<Money, BillingError> {
        let price = price.ensure_positive("price")?;
        let current = self
            .current_plan
            .as_mut()
            .ok_or_else(|| BillingError::invalid_state("client has no active plan"))?;
        current.price = price;
        self.updated_at = now;
        Ok(price)
    }

    /// Brings a suspended client back to active.
    pub fn reactivate(&mut self, now: Timestamp) -> Result<(), BillingError> {
        if self.status != ClientStatus::Suspended {
            return Err(BillingError::invalid_state(format!(
                "only suspended clients can be reactivated, client is {}",
                self.status
            )));
        }
        self.set_status(ClientStatus::Active, now);
        Ok(())
    }

    /// Marks the period as paid and moves the next due date.
    pub fn record_payment(&mut self, paid_at: Timestamp, next_due: Timestamp, now: Timestamp) {
        self.billing_status = BillingStatus::Paid;
        self.last_payment_at = Some(paid_at);
        self.next_payment_due = Some(next_due);
        self.updated_at = now;
    }

    pub fn mark_overdue(&mut self, now: Timestamp) {
        self.billing_status = BillingStatus::Overdue;
        self.updated_at = now;
    }

    /// Sets the lifecycle state. Returns true when it actually changed.
    pub fn set_status(&mut self, status: ClientStatus, now: Timestamp) -> bool {
        if self.status == status {
            return false;
        }
        self.status = status;
        self.updated_at = now;
        true
    }

    pub fn suspend(&mut self, now: Timestamp) -> bool {
        self.set_status(ClientStatus::Suspended, now)
    }

    /// Follows the provider's view of the subscription.
    ///
    /// Returns true when the lifecycle state changed.
    pub fn apply_provider_status(
        &mut self,
        status: ProviderSubscriptionStatus,
        now: Timestamp,
    ) -> bool {
        match status_for_provider(status) {
            Some(target) => self.set_status(target, now),
            None => false,
        }
    }

    /// Active, not yet flagged overdue, and past its due date.
    pub fn is_overdue_candidate(&self, as_of: &Timestamp) -> bool {
        self.status == ClientStatus::Active
            && self.billing_status != BillingStatus::Overdue
            && self
                .next_payment_due
                .map(|due| due.is_before(as_of))
                .unwrap_or(false)
    }

    /// Active, unpaid, and due inside `[from, to]`.
    pub fn is_due_within(&self, from: &Timestamp, to: &Timestamp) -> bool {
        self.status == ClientStatus::Active
            && self.billing_status != BillingStatus::Paid
            && self
                .next_payment_due
                .map(|due| due >= *from && due <= *to)
                .unwrap_or(false)
    }

    /// Replaces the plan catalog.
    ///
    /// The active plan must stay purchasable, so a catalog that drops
    /// its type is refused.
    pub fn replace_available_plans(
        &mut self,
        plans: Vec<Plan>,
        now: Timestamp,
    ) -> Result<(), BillingError> {
        validate_catalog(&plans)?;
        if let Some(current) = &self.current_plan {
            if !plans.iter().any(|p| p.plan_type == current.plan_type) {
                return Err(BillingError::invalid_state(format!(
                    "active plan '{}' must remain in the catalog",
                    current.plan_type
                )));
            }
        }
        self.available_plans = plans;
        self.updated_at = now;
        Ok(())
    }

    /// Applies operator edits to contact fields.
    pub fn update_contact(
        &mut self,
        changes: ClientChanges,
        now: Timestamp,
    ) -> Result<(), ValidationError> {
        if let Some(name) = changes.name {
            self.name = require_text("name", name)?;
        }
        if let Some(email) = changes.email {
            self.email = validate_email(email)?;
        }
        if let Some(phone) = changes.phone {
            self.phone = require_text("phone", phone)?;
        }
        if let Some(program) = changes.program {
            self.program = program;
        }
        if let Some(status) = changes.status {
            self.status = status;
        }
        self.updated_at = now;
        Ok(())
    }
}

fn require_text(field: &str, value: String) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(trimmed.to_string())
}

fn validate_email(email: String) -> Result<String, ValidationError> {
    let email = require_text("email", email)?.to_lowercase();
    match email.split_once('@') {
        Some((local, domain)) if !local.is_empty() && domain.contains('.') => Ok(email),
        _ => Err(ValidationError::invalid_format("email", "expected name@domain")),
    }
}
