//! Photo session handlers

use axum::{
    extract::{rejection::PathRejection, Path, State},
    http::StatusCode,
    Json,
};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::{
    extract::{path_id, JsonBody, RawBody},
    AppState,
};
use photostudio_common::{
    db::{models::SessionType, NewSession, Repository, SessionDetails, SessionUpdate},
    errors::{AppError, Result},
    payments::PaymentView,
    photos::{PhotosPatch, PhotosView},
};

/// Create session request
#[derive(Debug, Deserialize, Validate)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CreateSessionRequest {
    pub client_id: i64,

    pub session_date: NaiveDateTime,

    pub session_type: SessionType,

    #[validate(range(min = 0.0))]
    pub deposit: Option<f64>,

    #[validate(range(min = 0.0))]
    pub base_payment: Option<f64>,

    #[validate(range(min = 0.0))]
    pub additional_payment: Option<f64>,
}

/// Reschedule request. Payment and photo flags have their own endpoints.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UpdateSessionRequest {
    pub client_id: i64,
    pub session_date: NaiveDateTime,
    pub session_type: SessionType,
}

/// Session response
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub id: i64,
    pub client_id: i64,
    pub session_date: NaiveDateTime,
    pub session_type: SessionType,
    pub is_contract_finished: bool,
    pub photos_id: i64,
    pub payment: Option<PaymentView>,
    pub photos: Option<PhotosView>,
}

impl From<SessionDetails> for SessionResponse {
    fn from(details: SessionDetails) -> Self {
        let SessionDetails {
            session,
            payment,
            photos,
        } = details;
        let payment = payment.map(|p| PaymentView::new(&p, Some(&session)));
        Self {
            id: session.id,
            client_id: session.client_id,
            session_date: session.session_date,
            session_type: session.session_type,
            is_contract_finished: session.is_contract_finished,
            photos_id: session.photos_id,
            payment,
            photos: photos.as_ref().map(PhotosView::from),
        }
    }
}

/// Schedule a session for an existing client
pub async fn create_session(
    State(state): State<AppState>,
    JsonBody(request): JsonBody<CreateSessionRequest>,
) -> Result<(StatusCode, Json<SessionResponse>)> {
    request.validate()?;

    let repo = Repository::new(state.db.clone());
    let created = repo
        .create_session(NewSession {
            client_id: request.client_id,
            session_date: request.session_date,
            session_type: request.session_type,
            deposit: request.deposit,
            base_payment: request.base_payment,
            additional_payment: request.additional_payment,
        })
        .await?;

    tracing::info!(
        session_id = created.session.id,
        client_id = created.session.client_id,
        payment_id = created.session.payment_id,
        "Session created"
    );

    Ok((StatusCode::CREATED, Json(created.into())))
}

/// Get a session with its payment
pub async fn get_session(
    State(state): State<AppState>,
    session_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<Json<SessionResponse>> {
    let session_id = path_id(session_id, "sessionId")?;
    let repo = Repository::new(state.db.clone());

    let session = repo
        .find_session_by_id(session_id)
        .await?
        .ok_or(AppError::SessionNotFound { id: session_id })?;

    Ok(Json(session.into()))
}

/// Sessions with an open contract, by date
pub async fn list_sessions(State(state): State<AppState>) -> Result<Json<Vec<SessionResponse>>> {
    let repo = Repository::new(state.db.clone());
    let sessions = repo.list_unfinished_sessions().await?;

    Ok(Json(sessions.into_iter().map(Into::into).collect()))
}

/// Reschedule an open session
pub async fn update_session(
    State(state): State<AppState>,
    session_id: std::result::Result<Path<i64>, PathRejection>,
    JsonBody(request): JsonBody<UpdateSessionRequest>,
) -> Result<Json<SessionResponse>> {
    let session_id = path_id(session_id, "sessionId")?;
    let repo = Repository::new(state.db.clone());

    let session = repo
        .update_session(
            session_id,
            SessionUpdate {
                client_id: request.client_id,
                session_date: request.session_date,
                session_type: request.session_type,
            },
        )
        .await?;

    tracing::info!(session_id, client_id = request.client_id, "Session updated");

    Ok(Json(session.into()))
}

/// Partially update a session's photo delivery flags
pub async fn patch_photos(
    State(state): State<AppState>,
    session_id: std::result::Result<Path<i64>, PathRejection>,
    RawBody(body): RawBody,
) -> Result<Json<SessionResponse>> {
    let session_id = path_id(session_id, "sessionId")?;
    let patch = PhotosPatch::from_slice(&body)?;

    let repo = Repository::new(state.db.clone());
    let session = repo.update_photos(session_id, &patch).await?;

    tracing::info!(session_id, "Photo delivery status patched");

    Ok(Json(session.into()))
}

/// Delete a session with its payment and photo delivery record
pub async fn delete_session(
    State(state): State<AppState>,
    session_id: std::result::Result<Path<i64>, PathRejection>,
) -> Result<StatusCode> {
    let session_id = path_id(session_id, "sessionId")?;
    let repo = Repository::new(state.db.clone());

    repo.delete_session(session_id).await?;

    tracing::info!(session_id, "Session deleted");

    Ok(StatusCode::NO_CONTENT)
}
