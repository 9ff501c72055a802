//! HTTP handlers for payment endpoints.

use axum::extract::{Json, Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::dto::{parse_optional_bound, parse_status, Bound, ListFilterParams};
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::BillingAppState;
use crate::application::handlers::{
    ListPaymentsQuery, RegisterManualPaymentCommand, SetPaymentStatusCommand,
};
use crate::domain::billing::Payment;
use crate::domain::foundation::{ClientId, Money, PaymentId};
use crate::ports::PaymentFilter;

use super::dto::{PaymentResponse, RegisterPaymentRequest, SetPaymentStatusRequest};

fn to_response(payments: Vec<Payment>) -> Json<Vec<PaymentResponse>> {
    Json(payments.into_iter().map(PaymentResponse::from).collect())
}

/// GET /api/payments
pub async fn list_payments(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery::all())
        .await?;
    Ok(to_response(payments))
}

/// POST /api/payments
pub async fn register_payment(
    State(state): State<BillingAppState>,
    Json(request): Json<RegisterPaymentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = RegisterManualPaymentCommand {
        client_id: ClientId::from_uuid(request.client_id),
        amount: Money::from_major(request.amount),
        method: request.method,
        description: request.description,
        external_transaction_id: request.external_transaction_id,
    };
    let payment = state.register_payment_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(PaymentResponse::from(payment))))
}

/// PUT /api/payments/:id
pub async fn set_payment_status(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<SetPaymentStatusRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = SetPaymentStatusCommand {
        payment_id: PaymentId::from_uuid(id),
        status: request.status,
    };
    let payment = state.set_payment_status_handler().handle(cmd).await?;
    Ok(Json(PaymentResponse::from(payment)))
}

/// GET /api/payments/client/:client_id
pub async fn list_client_payments(
    State(state): State<BillingAppState>,
    Path(client_id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = ListPaymentsQuery::for_client(ClientId::from_uuid(client_id));
    let payments = state.list_payments_handler().handle(query).await?;
    Ok(to_response(payments))
}

/// GET /api/payments/history?client_id=&from=&to=&status=
pub async fn payment_history(
    State(state): State<BillingAppState>,
    Query(params): Query<ListFilterParams>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = PaymentFilter {
        client_id: params.client_id.map(ClientId::from_uuid),
        from: parse_optional_bound("from", params.from.as_deref(), Bound::Start)?,
        to: parse_optional_bound("to", params.to.as_deref(), Bound::End)?,
        status: parse_status(params.status.as_deref())?,
    };
    let payments = state
        .list_payments_handler()
        .handle(ListPaymentsQuery::filtered(filter))
        .await?;
    Ok(to_response(payments))
}
