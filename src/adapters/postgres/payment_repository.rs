//! PostgreSQL implementation of PaymentRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::Payment;
use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, Money, PaymentId, Timestamp,
};
use crate::ports::{PaymentFilter, PaymentRepository};

use super::{db_error, parse_column};

pub struct PostgresPaymentRepository {
    pool: PgPool,
}

impl PostgresPaymentRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct PaymentRow {
    id: Uuid,
    client_id: Uuid,
    amount_cents: i64,
    paid_at: DateTime<Utc>,
    status: String,
    external_transaction_id: String,
    method: String,
    description: Option<String>,
    invoice_generated: bool,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<PaymentRow> for Payment {
    type Error = DomainError;

    fn try_from(row: PaymentRow) -> Result<Self, Self::Error> {
        Ok(Payment {
            id: PaymentId::from_uuid(row.id),
            client_id: ClientId::from_uuid(row.client_id),
            amount: Money::from_cents(row.amount_cents),
            paid_at: Timestamp::from_datetime(row.paid_at),
            status: parse_column("status", &row.status)?,
            external_transaction_id: row.external_transaction_id,
            method: row.method,
            description: row.description,
            invoice_generated: row.invoice_generated,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const PAYMENT_COLUMNS: &str = r#"
    id, client_id, amount_cents, paid_at, status, external_transaction_id,
    method, description, invoice_generated, created_at, updated_at
"#;

#[async_trait]
impl PaymentRepository for PostgresPaymentRepository {
    async fn save(&self, payment: &Payment) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO payments (
                id, client_id, amount_cents, paid_at, status, external_transaction_id,
                method, description, invoice_generated, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11)
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.client_id.as_uuid())
        .bind(payment.amount.cents())
        .bind(payment.paid_at.as_datetime())
        .bind(payment.status.as_str())
        .bind(&payment.external_transaction_id)
        .bind(&payment.method)
        .bind(&payment.description)
        .bind(payment.invoice_generated)
        .bind(payment.created_at.as_datetime())
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                if db_err.constraint() == Some("payments_external_transaction_id_key") {
                    return DomainError::new(
                        ErrorCode::DuplicateRecord,
                        format!(
                            "transaction {} is already recorded",
                            payment.external_transaction_id
                        ),
                    );
                }
            }
            db_error("save payment")(e)
        })?;

        Ok(())
    }

    async fn update(&self, payment: &Payment) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE payments SET
                amount_cents = $2,
                paid_at = $3,
                status = $4,
                method = $5,
                description = $6,
                invoice_generated = $7,
                updated_at = $8
            WHERE id = $1
            "#,
        )
        .bind(payment.id.as_uuid())
        .bind(payment.amount.cents())
        .bind(payment.paid_at.as_datetime())
        .bind(payment.status.as_str())
        .bind(&payment.method)
        .bind(&payment.description)
        .bind(payment.invoice_generated)
        .bind(payment.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update payment"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::PaymentNotFound, "Payment not found")
                .with_detail("id", payment.id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: PaymentId) -> Result<Option<Payment>, DomainError> {
        let sql = format!("SELECT {} FROM payments WHERE id = $1", PAYMENT_COLUMNS);
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find payment"))?;

        row.map(Payment::try_from).transpose()
    }

    async fn find_by_external_transaction_id(
        &self,
        external_transaction_id: &str,
    ) -> Result<Option<Payment>, DomainError> {
        let sql = format!(
            "SELECT {} FROM payments WHERE external_transaction_id = $1",
            PAYMENT_COLUMNS
        );
        let row: Option<PaymentRow> = sqlx::query_as(&sql)
            .bind(external_transaction_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find payment by transaction"))?;

        row.map(Payment::try_from).transpose()
    }

    async fn list(&self, filter: PaymentFilter) -> Result<Vec<Payment>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM payments
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::timestamptz IS NULL OR paid_at >= $2)
              AND ($3::timestamptz IS NULL OR paid_at <= $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY paid_at DESC
            "#,
            PAYMENT_COLUMNS
        );
        let rows: Vec<PaymentRow> = sqlx::query_as(&sql)
            .bind(filter.client_id.map(|id| *id.as_uuid()))
            .bind(filter.from.map(|t| *t.as_datetime()))
            .bind(filter.to.map(|t| *t.as_datetime()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list payments"))?;

        rows.into_iter().map(Payment::try_from).collect()
    }

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM payments WHERE client_id = $1")
            .bind(client_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count payments"))?;

        Ok(count.max(0) as u64)
    }
}
