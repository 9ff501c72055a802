//! HTTP handlers for client endpoints.

use axum::extract::{Json, Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use uuid::Uuid;

use crate::adapters::http::dto::plans_from_dtos;
use crate::adapters::http::error::ApiError;
use crate::adapters::http::state::BillingAppState;
use crate::application::handlers::{
    CreateClientCommand, DeleteClientCommand, GetClientQuery, UpdateAvailablePlansCommand,
    UpdateClientCommand,
};
use crate::domain::foundation::ClientId;

use super::dto::{ClientResponse, CreateClientRequest, UpdateClientRequest, UpdatePlansRequest};

/// GET /api/clients
pub async fn list_clients(
    State(state): State<BillingAppState>,
) -> Result<impl IntoResponse, ApiError> {
    let clients = state.list_clients_handler().handle().await?;
    let response: Vec<ClientResponse> = clients.into_iter().map(ClientResponse::from).collect();
    Ok(Json(response))
}

/// POST /api/clients
pub async fn create_client(
    State(state): State<BillingAppState>,
    Json(request): Json<CreateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = CreateClientCommand {
        name: request.name,
        email: request.email,
        phone: request.phone,
        program: request.program,
        available_plans: plans_from_dtos(request.available_plans)?,
    };

    let client = state.create_client_handler().handle(cmd).await?;
    Ok((StatusCode::CREATED, Json(ClientResponse::from(client))))
}

/// GET /api/clients/:id
pub async fn get_client(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let query = GetClientQuery {
        client_id: ClientId::from_uuid(id),
    };
    let client = state.get_client_handler().handle(query).await?;
    Ok(Json(ClientResponse::from(client)))
}

/// PUT /api/clients/:id
pub async fn update_client(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateClientRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateClientCommand {
        client_id: ClientId::from_uuid(id),
        changes: request.into(),
    };
    let client = state.update_client_handler().handle(cmd).await?;
    Ok(Json(ClientResponse::from(client)))
}

/// DELETE /api/clients/:id
pub async fn delete_client(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = DeleteClientCommand {
        client_id: ClientId::from_uuid(id),
    };
    state.delete_client_handler().handle(cmd).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// PUT /api/clients/:id/plans
pub async fn update_available_plans(
    State(state): State<BillingAppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdatePlansRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let cmd = UpdateAvailablePlansCommand {
        client_id: ClientId::from_uuid(id),
        available_plans: plans_from_dtos(request.available_plans)?,
    };
    let client = state.update_available_plans_handler().handle(cmd).await?;
    Ok(Json(ClientResponse::from(client)))
}
