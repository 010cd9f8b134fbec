//! Client handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{extract::path_id, extract::JsonBody, AppState};
use photostudio_common::{
    db::{models::Client, Repository},
    errors::{AppError, Result},
};

/// Client details, for both create and full update
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct ClientRequest {
    #[validate(length(min = 1, max = 100))]
    pub first_name: String,

    #[validate(length(min = 1, max = 100))]
    pub last_name: String,

    #[validate(email)]
    pub email: Option<String>,

    #[validate(length(min = 3, max = 32))]
    pub phone_number: Option<String>,
}

/// Client response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientResponse {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub email: Option<String>,
    pub phone_number: Option<String>,
}

impl From<Client> for ClientResponse {
    fn from(client: Client) -> Self {
        Self {
            id: client.id,
            first_name: client.first_name,
            last_name: client.last_name,
            email: client.email,
            phone_number: client.phone_number,
        }
    }
}

/// Register a new client
pub async fn create_client(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<ClientRequest>,
) -> Result<(StatusCode, Json<ClientResponse>)> {
    request.validate()?;

    let repo = Repository::new(state.db.clone());
    let client = repo
        .create_client(
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            request.email,
            request.phone_number,
        )
        .await?;

    tracing::info!(client_id = client.id, "Client created");

    Ok((StatusCode::CREATED, Json(client.into())))
}

/// Get a client by id
pub async fn get_client(
    State(state): State<AppState>,
    client_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<ClientResponse>> {
    let client_id = path_id(client_id, "clientId")?;
    let repo = Repository::new(state.db.clone());

    let client = repo
        .find_client_by_id(client_id)
        .await?
        .ok_or(AppError::ClientNotFound { id: client_id })?;

    Ok(Json(client.into()))
}

/// Replace a client's details
pub async fn update_client(
    State(state): State<AppState>,
    client_id: std::result::Result<Path<i64>, PathRejection>,
    JsonBody(request): JsonBody<ClientRequest>,
) -> Result<Json<ClientResponse>> {
    let client_id = path_id(client_id, "clientId")?;
    request.validate()?;

    let repo = Repository::new(state.db.clone());
    let client = repo
        .update_client(
            client_id,
            request.first_name.trim().to_string(),
            request.last_name.trim().to_string(),
            request.email,
            request.phone_number,
        )
        .await?;

    tracing::info!(client_id, "Client updated");

    Ok(Json(client.into()))
}

/// Delete a client; refused while the client still has sessions
pub async fn delete_client(
    State(state): State<AppState>,
    client_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let client_id = path_id(client_id, "clientId")?;
    let repo = Repository::new(state.db.clone());

    repo.delete_client(client_id).await?;

    tracing::info!(client_id, "Client deleted");

    Ok(StatusCode::NO_CONTENT)
}

/// Clients with at least one open contract
pub async fn list_current_clients(
    State(state): State<AppState>,
) -> Result<Json<Vec<ClientResponse>>> {
    let repo = Repository::new(state.db.clone());
    let clients = repo.list_current_clients().await?;

    Ok(Json(clients.into_iter().map(Into::into).collect()))
}
