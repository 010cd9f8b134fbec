//! Fills the request path into structured error bodies

use axum::{
    extract::{OriginalUri, Request},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use photostudio_common::errors::ErrorResponse;

/// Re-render any `AppError` response with the path that produced it
pub async fn attach_request_path(request: Request, next: Next) -> Response {
    let path = request
        .extensions()
        .get::<OriginalUri>()
        .map(|uri| uri.path().to_owned())
        .unwrap_or_else(|| request.uri().path().to_owned());

    let response = next.run(request).await;

    match response.extensions().get::<ErrorResponse>().cloned() {
        Some(body) => {
            let (mut parts, _) = response.into_parts();
            parts.extensions.remove::<ErrorResponse>();
            let rendered = Json(body.with_path(path)).into_response();
            let (rendered_parts, rendered_body) = rendered.into_parts();
            parts.headers.extend(rendered_parts.headers);
            Response::from_parts(parts, rendered_body)
        }
        None => response,
    }
}
