//! HTTP handlers for subscription endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::client::ClientResponse;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::BillingAppState;
use crate::application::handlers::{
    CancelSubscriptionCommand, CreateSubscriptionCommand, GetSubscriptionStatusQuery,
    ReactivateSubscriptionCommand, UpdateSubscriptionCommand,
};
use crate::domain::foundation::{ClientId, Money};

use super::dto::{
    CreateSubscriptionRequest, CreateSubscriptionResponse, SubscriptionStatusResponse,
    UpdateSubscriptionRequest,
};

/// POST /api/subscriptions/client/:id
pub async fn create_subscription(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<CreateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateSubscriptionCommand {
        client_id: ClientId::from_uuid(id),
        plan_type: request.plan_type,
    };
    let result = state.create_subscription_handler().handle(cmd).await?;
    Ok((
        StatusCode::CREATED,
        Json(CreateSubscriptionResponse::from(result)),
    ))
}

/// DELETE /api/subscriptions/client/:id
pub async fn cancel_subscription(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CancelSubscriptionCommand {
        client_id: ClientId::from_uuid(id),
    };
    let client = state.cancel_subscription_handler().handle(cmd).await?;
    Ok(Json(ClientResponse::from(client)))
}

/// PUT /api/subscriptions/client/:id
pub async fn update_subscription(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateSubscriptionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateSubscriptionCommand {
        client_id: ClientId::from_uuid(id),
        plan_type: request.plan_type,
        price: request.price.map(Money::from_major),
    };
    let client = state.update_subscription_handler().handle(cmd).await?;
    Ok(Json(ClientResponse::from(client)))
}

/// GET /api/subscriptions/client/:id
pub async fn get_subscription_status(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetSubscriptionStatusQuery {
        client_id: ClientId::from_uuid(id),
    };
    let view = state.subscription_status_handler().handle(query).await?;
    Ok(Json(SubscriptionStatusResponse::from(view)))
}

/// POST /api/subscriptions/client/:id/reactivate
pub async fn reactivate_subscription(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = ReactivateSubscriptionCommand {
        client_id: ClientId::from_uuid(id),
    };
    let client = state.reactivate_subscription_handler().handle(cmd).await?;
    Ok(Json(ClientResponse::from(client)))
}
