//! Fixtures shared by handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::memory::{
    InMemoryClientRepository, InMemoryInvoiceRepository, InMemoryPaymentRepository,
};
use crate::adapters::mercadopago::MockPaymentProvider;
use crate::domain::billing::{
    Client, ClientStatus, NewClient, NewPayment, Payment, Plan, PlanType, Program,
};
use crate::domain::foundation::{ClientId, DomainError, ErrorCode, Money, Timestamp};
use crate::ports::{PaymentReminder, PaymentReminderNotifier};

pub const BASIC_CENTS: i64 = 10_000;
pub const PRO_CENTS: i64 = 30_000;

/// In-memory adapters wired together for one test.
pub struct Fixture {
    pub clients: Arc<InMemoryClientRepository>,
    pub payments: Arc<InMemoryPaymentRepository>,
    pub invoices: Arc<InMemoryInvoiceRepository>,
    pub provider: Arc<MockPaymentProvider>,
}

impl Fixture {
    pub fn new() -> Self {
        Self {
            clients: Arc::new(InMemoryClientRepository::new()),
            payments: Arc::new(InMemoryPaymentRepository::new()),
            invoices: Arc::new(InMemoryInvoiceRepository::new()),
            provider: Arc::new(MockPaymentProvider::new()),
        }
    }

    pub async fn insert_client(&self, client: &Client) {
        use crate::ports::ClientRepository;
        self.clients.save(client).await.unwrap();
    }

    pub async fn insert_payment(&self, payment: &Payment) {
        use crate::ports::PaymentRepository;
        self.payments.save(payment).await.unwrap();
    }

    pub async fn client(&self, id: ClientId) -> Client {
        use crate::ports::ClientRepository;
        self.clients.find_by_id(id).await.unwrap().unwrap()
    }
}

pub fn catalog() -> Vec<Plan> {
    vec![
        Plan {
            plan_type: PlanType::Basic,
            price: Money::from_cents(BASIC_CENTS),
            description: None,
        },
        Plan {
            plan_type: PlanType::Pro,
            price: Money::from_cents(PRO_CENTS),
            description: Some("Unlimited seats".to_string()),
        },
    ]
}

pub fn new_client(email: &str) -> Client {
    Client::create(
        NewClient {
            name: "Clinica Dental Sur".to_string(),
            email: email.to_string(),
            phone: "+54 11 4000 0000".to_string(),
            program: Program::OdontoCare,
            available_plans: catalog(),
        },
        Timestamp::now(),
    )
    .unwrap()
}

/// Client already subscribed to the basic plan under `subscription_id`.
pub fn subscribed_client(email: &str, subscription_id: &str) -> Client {
    let mut client = new_client(email);
    let plan = client.find_plan(PlanType::Basic).unwrap().clone();
    client.subscribe(subscription_id.to_string(), &plan, Timestamp::now());
    client
}

pub fn client_with_status(email: &str, subscription_id: &str, status: ClientStatus) -> Client {
    let mut client = subscribed_client(email, subscription_id);
    client.status = status;
    client
}

pub fn approved_payment(client_id: ClientId, paid_at: Timestamp, tx: &str) -> Payment {
    Payment::manual(
        NewPayment {
            client_id,
            amount: Money::from_cents(BASIC_CENTS),
            paid_at,
            external_transaction_id: tx.to_string(),
            method: "manual".to_string(),
            description: None,
        },
        Timestamp::now(),
    )
    .unwrap()
}

pub fn pending_payment(client_id: ClientId, paid_at: Timestamp, tx: &str) -> Payment {
    Payment::from_provider(
        NewPayment {
            client_id,
            amount: Money::from_cents(BASIC_CENTS),
            paid_at,
            external_transaction_id: tx.to_string(),
            method: "MercadoPago - visa".to_string(),
            description: None,
        },
        false,
        Timestamp::now(),
    )
    .unwrap()
}

/// Notifier that keeps every reminder and can be told to fail for one email.
#[derive(Default)]
pub struct RecordingNotifier {
    sent: Mutex<Vec<PaymentReminder>>,
    failing_email: Option<String>,
}

impl RecordingNotifier {
    pub fn failing_for(email: &str) -> Self {
        Self {
            sent: Mutex::new(Vec::new()),
            failing_email: Some(email.to_string()),
        }
    }

    pub fn sent(&self) -> Vec<PaymentReminder> {
        self.sent.lock().unwrap().clone()
    }
}

#[async_trait]
impl PaymentReminderNotifier for RecordingNotifier {
    async fn send_payment_reminder(&self, reminder: &PaymentReminder) -> Result<(), DomainError> {
        if self.failing_email.as_deref() == Some(reminder.email.as_str()) {
            return Err(DomainError::new(ErrorCode::ExternalServiceError, "mailbox full"));
        }
        self.sent.lock().unwrap().push(reminder.clone());
        Ok(())
    }
}
