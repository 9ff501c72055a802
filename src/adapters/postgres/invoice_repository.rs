//! PostgreSQL implementation of InvoiceRepository.
//!
//! `number` and `sequence` are stored side by side; both carry unique
//! indexes so a concurrent issuer that computed the same successor fails
//! on insert instead of duplicating a number.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::billing::{Invoice, InvoiceNumber, LineItem};
use crate::domain::foundation::{
    ClientId, DomainError, ErrorCode, InvoiceId, Money, PaymentId, Timestamp,
};
use crate::ports::{InvoiceFilter, InvoiceRepository};

use super::{db_error, parse_column};

pub struct PostgresInvoiceRepository {
    pool: PgPool,
}

impl PostgresInvoiceRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct InvoiceRow {
    id: Uuid,
    client_id: Uuid,
    payment_id: Uuid,
    sequence: i64,
    issued_at: DateTime<Utc>,
    total_cents: i64,
    line_items: String,
    status: String,
    document_url: Option<String>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<InvoiceRow> for Invoice {
    type Error = DomainError;

    fn try_from(row: InvoiceRow) -> Result<Self, Self::Error> {
        let sequence = u64::try_from(row.sequence).map_err(|_| {
            DomainError::database(format!("Negative invoice sequence: {}", row.sequence))
        })?;
        let number = InvoiceNumber::from_sequence(sequence)
            .map_err(|e| DomainError::database(format!("Invalid invoice sequence: {}", e)))?;
        let line_items: Vec<LineItem> = serde_json::from_str(&row.line_items).map_err(|e| {
            DomainError::database(format!("Invalid line_items for invoice {}: {}", row.id, e))
        })?;

        Ok(Invoice {
            id: InvoiceId::from_uuid(row.id),
            client_id: ClientId::from_uuid(row.client_id),
            payment_id: PaymentId::from_uuid(row.payment_id),
            number,
            issued_at: Timestamp::from_datetime(row.issued_at),
            total: Money::from_cents(row.total_cents),
            line_items,
            status: parse_column("status", &row.status)?,
            document_url: row.document_url,
            created_at: Timestamp::from_datetime(row.created_at),
            updated_at: Timestamp::from_datetime(row.updated_at),
        })
    }
}

const INVOICE_COLUMNS: &str = r#"
    id, client_id, payment_id, sequence, issued_at, total_cents,
    line_items::text AS line_items, status, document_url, created_at, updated_at
"#;

#[async_trait]
impl InvoiceRepository for PostgresInvoiceRepository {
    async fn save(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let line_items = serde_json::to_string(&invoice.line_items)
            .map_err(|e| DomainError::database(format!("Failed to encode line items: {}", e)))?;
        let sequence = i64::try_from(invoice.number.sequence()).map_err(|_| {
            DomainError::database(format!("Invoice sequence out of range: {}", invoice.number))
        })?;

        sqlx::query(
            r#"
            INSERT INTO invoices (
                id, client_id, payment_id, number, sequence, issued_at, total_cents,
                line_items, status, document_url, created_at, updated_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7, $8::jsonb, $9, $10, $11, $12)
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.client_id.as_uuid())
        .bind(invoice.payment_id.as_uuid())
        .bind(invoice.number.to_string())
        .bind(sequence)
        .bind(invoice.issued_at.as_datetime())
        .bind(invoice.total.cents())
        .bind(line_items)
        .bind(invoice.status.as_str())
        .bind(&invoice.document_url)
        .bind(invoice.created_at.as_datetime())
        .bind(invoice.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(ref db_err) = e {
                match db_err.constraint() {
                    Some("invoices_number_key") => {
                        return DomainError::new(
                            ErrorCode::DuplicateRecord,
                            format!("invoice number {} is already taken", invoice.number),
                        )
                    }
                    Some("invoices_payment_id_key") => {
                        return DomainError::new(
                            ErrorCode::DuplicateRecord,
                            format!("payment {} is already invoiced", invoice.payment_id),
                        )
                    }
                    _ => {}
                }
            }
            db_error("save invoice")(e)
        })?;

        Ok(())
    }

    async fn update(&self, invoice: &Invoice) -> Result<(), DomainError> {
        let result = sqlx::query(
            r#"
            UPDATE invoices SET
                status = $2,
                document_url = $3,
                updated_at = $4
            WHERE id = $1
            "#,
        )
        .bind(invoice.id.as_uuid())
        .bind(invoice.status.as_str())
        .bind(&invoice.document_url)
        .bind(invoice.updated_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("update invoice"))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(ErrorCode::InvoiceNotFound, "Invoice not found")
                .with_detail("id", invoice.id.to_string()));
        }
        Ok(())
    }

    async fn find_by_id(&self, id: InvoiceId) -> Result<Option<Invoice>, DomainError> {
        let sql = format!("SELECT {} FROM invoices WHERE id = $1", INVOICE_COLUMNS);
        let row: Option<InvoiceRow> = sqlx::query_as(&sql)
            .bind(id.as_uuid())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find invoice"))?;

        row.map(Invoice::try_from).transpose()
    }

    async fn find_latest(&self) -> Result<Option<Invoice>, DomainError> {
        let sql = format!(
            "SELECT {} FROM invoices ORDER BY created_at DESC, sequence DESC LIMIT 1",
            INVOICE_COLUMNS
        );
        let row: Option<InvoiceRow> = sqlx::query_as(&sql)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("find latest invoice"))?;

        row.map(Invoice::try_from).transpose()
    }

    async fn list(&self, filter: InvoiceFilter) -> Result<Vec<Invoice>, DomainError> {
        let sql = format!(
            r#"
            SELECT {} FROM invoices
            WHERE ($1::uuid IS NULL OR client_id = $1)
              AND ($2::timestamptz IS NULL OR issued_at >= $2)
              AND ($3::timestamptz IS NULL OR issued_at <= $3)
              AND ($4::text IS NULL OR status = $4)
            ORDER BY issued_at DESC
            "#,
            INVOICE_COLUMNS
        );
        let rows: Vec<InvoiceRow> = sqlx::query_as(&sql)
            .bind(filter.client_id.map(|id| *id.as_uuid()))
            .bind(filter.from.map(|t| *t.as_datetime()))
            .bind(filter.to.map(|t| *t.as_datetime()))
            .bind(filter.status.map(|s| s.as_str()))
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("list invoices"))?;

        rows.into_iter().map(Invoice::try_from).collect()
    }

    async fn count_for_client(&self, client_id: ClientId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM invoices WHERE client_id = $1")
            .bind(client_id.as_uuid())
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("count invoices"))?;

        Ok(count.max(0) as u64)
    }
}
