//! Router fixtures shared by the handler tests

use axum::{
    body::Body,
    http::{header, Request, StatusCode},
    Router,
};
use photostudio_common::{
    config::{AppConfig, DatabaseConfig},
    db::{
        models::{Payment, PhotoSession, SessionType},
        schema, DbPool, NewSession, Repository,
    },
};
use std::sync::Arc;
use tower::ServiceExt;

use crate::{create_router, AppState};

/// Router over a fresh in-memory database, plus a repository on the same pool
pub async fn test_app() -> (Router, Repository) {
    let mut config = AppConfig::default();
    config.database = DatabaseConfig::in_memory();
    config.rate_limit.enabled = false;

    let db = DbPool::new(&config.database).await.unwrap();
    schema::create_tables(db.conn()).await.unwrap();

    let state = AppState {
        config: Arc::new(config),
        db: db.clone(),
    };

    (create_router(state), Repository::new(db))
}

/// A client with one open session: deposit 50, base 100, additional 20
pub async fn seed_session(repo: &Repository) -> (PhotoSession, Payment) {
    let client = repo
        .create_client("Maria".into(), "Wisniewska".into(), None, None)
        .await
        .unwrap();

    let created = repo
        .create_session(NewSession {
            client_id: client.id,
            session_date: chrono::NaiveDate::from_ymd_opt(2026, 7, 4)
                .unwrap()
                .and_hms_opt(10, 0, 0)
                .unwrap(),
            session_type: SessionType::Family,
            deposit: Some(50.0),
            base_payment: Some(100.0),
            additional_payment: Some(20.0),
        })
        .await
        .unwrap();

    (created.session, created.payment.unwrap())
}

/// Send one request; an empty response body comes back as `Value::Null`
pub async fn send(
    app: &Router,
    method: &str,
    uri: &str,
    body: Option<&str>,
) -> (StatusCode, serde_json::Value) {
    let request = Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(body.map(|b| Body::from(b.to_owned())).unwrap_or_else(Body::empty))
        .unwrap();

    let response = app.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();

    let json = if bytes.is_empty() {
        serde_json::Value::Null
    } else {
        serde_json::from_slice(&bytes).unwrap()
    };

    (status, json)
}
