//! Response DTOs for invoice endpoints.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::billing::{Invoice, InvoiceStatus, LineItem};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LineItemDto {
    pub description: String,
    pub amount: f64,
}

impl From<&LineItem> for LineItemDto {
    fn from(item: &LineItem) -> Self {
        Self {
            description: item.description.clone(),
            amount: item.amount.as_major(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct InvoiceResponse {
    pub id: String,
    pub client_id: String,
    pub payment_id: String,
    /// `FACT-000001` style.
    pub number: String,
    pub issued_at: DateTime<Utc>,
    pub total: f64,
    pub line_items: Vec<LineItemDto>,
    pub status: InvoiceStatus,
    pub document_url: Option<String>,
}

impl From<Invoice> for InvoiceResponse {
    fn from(invoice: Invoice) -> Self {
        Self {
            id: invoice.id.to_string(),
            client_id: invoice.client_id.to_string(),
            payment_id: invoice.payment_id.to_string(),
            number: invoice.number.to_string(),
            issued_at: *invoice.issued_at.as_datetime(),
            total: invoice.total.as_major(),
            line_items: invoice.line_items.iter().map(LineItemDto::from).collect(),
            status: invoice.status,
            document_url: invoice.document_url,
        }
    }
}
