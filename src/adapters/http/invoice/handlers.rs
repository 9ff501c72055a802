//! HTTP handlers for invoice endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::dto::{parse_optional_bound, parse_status, Bound, ListFilterParams};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::BillingAppState;
use crate::application::handlers::{IssueInvoiceCommand, ListInvoicesQuery, VoidInvoiceCommand};
use crate::domain::billing::Invoice;
use crate::domain::foundation::{ClientId, InvoiceId, PaymentId};
use crate::ports::InvoiceFilter;

use super::dto::InvoiceResponse;

fn to_response(invoices: Vec<Invoice>) -> Json<Vec<InvoiceResponse>> {
    Json(invoices.into_iter().map(InvoiceResponse::from).collect())
}

/// GET /api/invoices?client_id=&from=&to=&status=
pub async fn list_invoices(
    State(state): State<BillingAppState>,
    Query(params): Query<ListFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = InvoiceFilter {
        client_id: params.client_id.map(ClientId::from_uuid),
        from: parse_optional_bound("from", params.from.as_deref(), Bound::Start)?,
        to: parse_optional_bound("to", params.to.as_deref(), Bound::End)?,
        status: parse_status(params.status.as_deref())?,
    };
    let invoices = state
        .list_invoices_handler()
        .handle(ListInvoicesQuery::filtered(filter))
        .await?;
    Ok(to_response(invoices))
}

/// POST /api/invoices/payment/:payment_id
pub async fn issue_invoice(
    State(state): State<BillingAppState>,
    Path(payment_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = IssueInvoiceCommand {
        payment_id: PaymentId::from_uuid(payment_id),
    };
    let invoice = state.issue_invoice_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(InvoiceResponse::from(invoice))))
}

/// GET /api/invoices/client/:client_id
pub async fn list_client_invoices(
    State(state): State<BillingAppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListInvoicesQuery::for_client(ClientId::from_uuid(client_id));
    let invoices = state.list_invoices_handler().handle(query).await?;
    Ok(to_response(invoices))
}

/// PUT /api/invoices/:id/void
pub async fn void_invoice(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = VoidInvoiceCommand {
        invoice_id: InvoiceId::from_uuid(id),
    };
    let invoice = state.void_invoice_handler().handle(cmd).await?;
    Ok(Json(InvoiceResponse::from(invoice)))
}
