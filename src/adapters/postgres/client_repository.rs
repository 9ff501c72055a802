//! PostgreSQL implementation of ClientRepository.
//!
//! The plan catalog is stored as JSONB; the active plan is flattened into
//! three nullable columns. Every update bumps `version` without comparing it.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Client, CurrentPlan, Plan};
use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, ExtraChargeId, Money, Timestamp,
};
use crate::ports::ClientRepository;

use super::{db_error, parse_column};

const CLIENT_COLUMNS: &str = r#"
    id, name, email, phone, program, started_at, status,
    available_plans::text AS available_plans,
    current_plan_type, current_plan_price_cents, current_plan_activated_at,
    monthly_actual_spend_cents, extra_charge_ids, subscription_id,
    billing_status, next_payment_due, last_payment_at, created_at, updated_at, version
"#;

pub struct PostgresClientRepository {
    pool: PgPool,
}

impl PostgresClientRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn select_clients(condition: &str) -> String {
    format!("SELECT {} FROM clients {}", CLIENT_COLUMNS, condition)
}

/// Database row representation of a client.
#[derive(Debug, sqlx::FromRow)]
struct ClientRow {
    id: Uuid,
    name: String,
    email: String,
    phone: String,
    program: String,
    started_at: DateTime<Utc>,
    status: String,
    available_plans: String,
    current_plan_type: Option<String>,
    current_plan_price_cents: Option<i64>,
    current_plan_activated_at: Option<DateTime<Utc>>,
    monthly_actual_spend_cents: i64,
    extra_charge_ids: Vec<Uuid>,
    subscription_id: Option<String>,
    billing_status: String,
    next_payment_due: Option<DateTime<Utc>>,
    last_payment_at: Option<DateTime<Utc>>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    #[allow(dead_code)]
    version: i32,
}

impl TryFrom<ClientRow> for Client {
    type Error = DomainError;

    fn try_from(row: ClientRow) -> Result<Self, Self::Error> {
        let available_plans: Vec<Plan> = serde_json::from_str(&row.available_plans).map_err(|e| {
            DomainError::database(format!("Invalid available_plans for client {}: {}", row.id, e))
        })?;

        let current_plan = match (
            row.current_plan_type,
            row.current_plan_price_cents,
            row.current_plan_activated_at,
        ) {
            (Some(plan_type), Some(price), Some(activated_at)) => Some(CurrentPlan {
                plan_type: parse_column("current_plan_type", &plan_type)?,
                price: Money::from_cents(price),
                activated_at: Timestamp::from_datetime(activated_at),
            }),
            _ => None,
        };

        Ok(Client {
            id: ClientId::from_uuid(row.id),
            name: row.name,
            email: row.email,
            phone: row.phone,
            program: parse_column("program", &row.program)?,
            started_at: Timestamp::from_datetime(row.started_at),
            status: parse_column("status", &row.status)?,
            available_plans,
            current_plan,
            monthly_actual_spend: Money::from_cents(row.monthly_actual_spend_cents),
            extra_charge_ids: row
                .extra_charge_ids
                .into_iter()
                .map(ExtraChargeId::from_uuid)
                .collect(),
            subscription_id: row.subscription_id,
            billing_status: parse_column("billing_status", &row.billing_status)?,
            next_payment_due: row.next_payment_due.map(Timestamp::from_datetime),
            last_payment_at: row.last_payment_at.map(Timestamp::from_datetime),
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

fn plans_json(client: &Client) -> Result<String, DomainError> {
    serde_json::to_string(&client.available_plans)
        .map_err(|e| DomainError::database(format!("Failed to encode plans: {}", e)))
}

fn extra_charge_uuids(client: &Client) -> Vec<Uuid> {
    client
        .extra_charge_ids
        .iter()
        .map(|id| *id.as_uuid())
        .collect()
}

fn map_unique_violation(e: sqlx::Error, client: &Client, action: &'static str) -> DomainError {
    if let sqlx::Error::Database(db_err) = &e {
        match db_err.constraint() {
            Some("clients_email_key") => {
                return DomainError::new(
                    ErrorCode::DuplicateRecord,
                    format!("email {} is already registered", client.email),
                )
            }
            Some("clients_subscription_id_key") => {
                return DomainError::new(
                    ErrorCode::DuplicateRecord,
                    "subscription already belongs to another client",
                )
            }
            _ => {}
        }
    }
    db_error(action)(e)
}

#[async_trait]
impl ClientRepository for PostgresClientRepository {
    async fn save(&self, client: &Client) -> Result<(), DomainError> {
        let plans = plans_json(client)?;
        let current = client.current_plan.as_ref();

        sqlx::query(
            r#"
            INSERT INTO clients (
                id, name, email, phone, program, started_at, status, available_plans,
                current_plan_type, current_plan_price_cents, current_plan_activated_at,
                monthly_actual_spend_cents, extra_charge_ids, subscription_id,
                billing_status, next_payment_due, last_payment_at, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8::jsonb, $9, $10, $11, $12, $13, $14,
                      $15, $16, $17, $18, $19)
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.program.as_str())
        .bind(client.started_at.as_datetime())
        .bind(client.status.as_str())
        .bind(plans)
        .bind(current.map(|p| p.plan_type.as_str()))
        .bind(current.map(|p| p.price.cents()))
        .bind(current.map(|p| *p.activated_at.as_datetime()))
        .bind(client.monthly_actual_spend.cents())
        .bind(extra_charge_uuids(client))
        .bind(&client.subscription_id)
        .bind(client.billing_status.as_str())
        .bind(client.next_payment_due.map(|t| *t.as_datetime()))
        .bind(client.last_payment_at.map(|t| *t.as_datetime()))
        .bind(client.created_at.as_datetime())
        .bind(client.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, client, "save client"))?;

        Ok(())
    }

    async fn update(&self, client: &Client) -> Result<(), DomainError> {
        let plans = plans_json(client)?;
        let current = client.current_plan.as_ref();

        let result = sqlx::query(
            r#"
            UPDATE clients SET
                name = $2,
                email = $3,
                phone = $4,
                program = $5,
                status = $6,
                available_plans = $7::jsonb,
                current_plan_type = $8,
                current_plan_price_cents = $9,
                current_plan_activated_at = $10,
                monthly_actual_spend_cents = $11,
                extra_charge_ids = $12,
                subscription_id = $13,
                billing_status = $14,
                next_payment_due = $15,
                last_payment_at = $16,
                updated_at = $17,
                version = version + 1
            WHERE id = $1
            "#,
        )
        .bind(client.id.as_uuid())
        .bind(&client.name)
        .bind(&client.email)
        .bind(&client.phone)
        .bind(client.program.as_str())
        .bind(client.status.as_str())
        .bind(plans)
        .bind(current.map(|p| p.plan_type.as_str()))
        .bind(current.map(|p| p.price.cents()))
        .bind(current.map(|p| *p.activated_at.as_datetime()))
        .bind(client.monthly_actual_spend.cents())
        .bind(extra_charge_uuids(client))
        .bind(&client.subscription_id)
        .bind(client.billing_status.as_str())
        .bind(client.next_payment_due.map(|t| *t.as_datetime()))
        .bind(client.last_payment_at.map(|t| *t.as_datetime()))
        .bind(client.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| map_unique_violation(e, client, "update client"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ClientNotFound, "Client not found")
                .with_detail("id", client.id.to_string()));
        }
        Ok(())
    }

    async fn delete(&self, id: ClientId) -> Result<(), DomainError> {
        let result = sqlx::query("DELETE FROM clients WHERE id = $1")
            .bind(id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(db_error("delete client"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::ClientNotFound, "Client not found")
                .with_detail("id", id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: ClientId) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(&select_clients("WHERE id = $1"))
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find client"))?;

        row.map(Client::try_from).transpose()
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> = sqlx::query_as(&select_clients("WHERE email = $1"))
            .bind(email.to_lowercase())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find client by email"))?;

        row.map(Client::try_from).transpose()
    }

    async fn find_by_subscription_id(
        &self,
        subscription_id: &str,
    ) -> Result<Option<Client>, DomainError> {
        let row: Option<ClientRow> =
            sqlx::query_as(&select_clients("WHERE subscription_id = $1"))
                .bind(subscription_id)
                .fetch_optional(&self.pool)
                .await
                .map_err(db_error("find client by subscription"))?;

        row.map(Client::try_from).transpose()
    }

    async fn list_all(&self) -> Result<Vec<Client>, DomainError> {
        let rows: Vec<ClientRow> = sqlx::query_as(&select_clients("ORDER BY created_at ASC"))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list clients"))?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn find_overdue_candidates(&self, as_of: Timestamp) -> Result<Vec<Client>, DomainError> {
        let rows: Vec<ClientRow> = sqlx::query_as(&select_clients(
            r#"
            WHERE status = 'active'
              AND billing_status <> 'overdue'
              AND next_payment_due < $1
            ORDER BY next_payment_due ASC
            "#,
        ))
        .bind(as_of.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find overdue clients"))?;

        rows.into_iter().map(Client::try_from).collect()
    }

    async fn find_due_within(
        &self,
        from: Timestamp,
        to: Timestamp,
    ) -> Result<Vec<Client>, DomainError> {
        let rows: Vec<ClientRow> = sqlx::query_as(&select_clients(
            r#"
            WHERE status = 'active'
              AND billing_status <> 'paid'
              AND next_payment_due BETWEEN $1 AND $2
            ORDER BY next_payment_due ASC
            "#,
        ))
        .bind(from.as_datetime())
        .bind(to.as_datetime())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("find clients due soon"))?;

        rows.into_iter().map(Client::try_from).collect()
    }
}
