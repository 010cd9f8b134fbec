//! Request extractors that report failures as structured `AppError`s
//! instead of axum's plain-text rejections.

use axum::{
    body::Bytes,
    extract::{
        rejection::{BytesRejection, PathRejection},
        FromRequest, Path, Request,
    },
    http::StatusCode,
};
use photostudio_common::errors::{AppError, Result};
use serde::de::DeserializeOwned;

/// Raw request body, for handlers that parse it themselves
#[derive(Debug)]
pub struct RawBody(pub Bytes);

impl<S> FromRequest<S> for RawBody
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        Bytes::from_request(req, state)
            .await
            .map(RawBody)
            .map_err(body_rejection)
    }
}

/// JSON body; any read or decode failure is an `AppError`
#[derive(Debug)]
pub struct JsonBody<T>(pub T);

impl<S, T> FromRequest<S> for JsonBody<T>
where
    T: DeserializeOwned + Send,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> std::result::Result<Self, Self::Rejection> {
        let RawBody(body) = RawBody::from_request(req, state).await?;

        serde_json::from_slice(&body)
            .map(JsonBody)
            .map_err(|e| AppError::invalid_request(format!("Malformed JSON: {}", e)))
    }
}

fn body_rejection(rejection: BytesRejection) -> AppError {
    if rejection.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge {
            message: rejection.body_text(),
        }
    } else {
        AppError::invalid_request(rejection.body_text())
    }
}

/// Unwrap a numeric id path segment, naming the parameter on failure
pub fn path_id(path: std::result::Result<Path<i64>, PathRejection>, name: &str) -> Result<i64> {
    path.map(|Path(id)| id)
        .map_err(|_| AppError::invalid_request(format!("Invalid argument: {}", name)))
}
