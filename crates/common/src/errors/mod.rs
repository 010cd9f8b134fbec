//! Error types for photo studio services
//!
//! Provides a single error enum shared by the service layer and the HTTP
//! boundary with:
//! - Distinct variants for each expected failure mode
//! - HTTP status code mapping
//! - Structured error responses
//! - Error codes for client handling

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result type alias using AppError
pub type Result<T> = std::result::Result<T, AppError>;

/// Error codes for machine-readable error identification
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ErrorCode {
    // Validation errors (1xxx)
    InvalidRequest,
    ValidationError,
    PayloadTooLarge,

    // Resource errors (4xxx)
    PaymentNotFound,
    SessionNotFound,
    ClientNotFound,

    // Conflict errors (5xxx)
    ContractFinished,
    SessionUpdateNotAllowed,
    ClientHasSessions,

    // Rate limiting (6xxx)
    RateLimited,

    // Database errors (7xxx)
    DatabaseError,
    ConnectionError,

    // Internal errors (9xxx)
    InternalError,
    ConfigurationError,
    SerializationError,
}

impl ErrorCode {
    /// Get the numeric code for this error
    pub fn as_code(&self) -> u16 {
        match self {
            ErrorCode::InvalidRequest => 1001,
            ErrorCode::ValidationError => 1002,
            ErrorCode::PayloadTooLarge => 1003,

            ErrorCode::PaymentNotFound => 4001,
            ErrorCode::SessionNotFound => 4002,
            ErrorCode::ClientNotFound => 4003,

            ErrorCode::ContractFinished => 5001,
            ErrorCode::SessionUpdateNotAllowed => 5002,
            ErrorCode::ClientHasSessions => 5003,

            ErrorCode::RateLimited => 6001,

            ErrorCode::DatabaseError => 7001,
            ErrorCode::ConnectionError => 7002,

            ErrorCode::InternalError => 9001,
            ErrorCode::ConfigurationError => 9002,
            ErrorCode::SerializationError => 9003,
        }
    }
}

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Request errors
    #[error("{message}")]
    InvalidRequest { message: String },

    #[error("Validation failed: {message}")]
    Validation {
        message: String,
        field: Option<String>,
    },

    #[error("Request body too large: {message}")]
    PayloadTooLarge { message: String },

    // Resource errors
    #[error("Payment with id {id} not found")]
    PaymentNotFound { id: i64 },

    #[error("Photo session with id {id} not found")]
    SessionNotFound { id: i64 },

    #[error("Client with id {id} not found")]
    ClientNotFound { id: i64 },

    // Conflict errors
    #[error("Contract already finished for payment {payment_id}")]
    ContractFinished { payment_id: i64 },

    #[error("Photo session {id} has a finished contract and cannot be updated")]
    SessionUpdateNotAllowed { id: i64 },

    #[error("Client {id} still has photo sessions")]
    ClientHasSessions { id: i64 },

    // Rate limiting
    #[error("Rate limit exceeded: {limit} requests per second")]
    RateLimited { limit: u32 },

    // Database errors
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    #[error("Database connection error: {message}")]
    DatabaseConnection { message: String },

    // Internal errors
    #[error("Internal server error: {message}")]
    Internal { message: String },

    #[error("Configuration error: {message}")]
    Configuration { message: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    // Generic
    #[error("{0}")]
    Other(#[from] anyhow::Error),
}

impl AppError {
    /// Shorthand for an `InvalidRequest` with the given message
    pub fn invalid_request(message: impl Into<String>) -> Self {
        AppError::InvalidRequest {
            message: message.into(),
        }
    }

    /// Get the error code for this error
    pub fn code(&self) -> ErrorCode {
        match self {
            AppError::InvalidRequest { .. } => ErrorCode::InvalidRequest,
            AppError::Validation { .. } => ErrorCode::ValidationError,
            AppError::PayloadTooLarge { .. } => ErrorCode::PayloadTooLarge,
            AppError::PaymentNotFound { .. } => ErrorCode::PaymentNotFound,
            AppError::SessionNotFound { .. } => ErrorCode::SessionNotFound,
            AppError::ClientNotFound { .. } => ErrorCode::ClientNotFound,
            AppError::ContractFinished { .. } => ErrorCode::ContractFinished,
            AppError::SessionUpdateNotAllowed { .. } => ErrorCode::SessionUpdateNotAllowed,
            AppError::ClientHasSessions { .. } => ErrorCode::ClientHasSessions,
            AppError::RateLimited { .. } => ErrorCode::RateLimited,
            AppError::Database(_) => ErrorCode::DatabaseError,
            AppError::DatabaseConnection { .. } => ErrorCode::ConnectionError,
            AppError::Internal { .. } => ErrorCode::InternalError,
            AppError::Configuration { .. } => ErrorCode::ConfigurationError,
            AppError::Serialization(_) => ErrorCode::SerializationError,
            AppError::Other(_) => ErrorCode::InternalError,
        }
    }

    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> StatusCode {
        match self {
            // 400 Bad Request
            AppError::InvalidRequest { .. } | AppError::Validation { .. } => {
                StatusCode::BAD_REQUEST
            }

            // 413 Payload Too Large
            AppError::PayloadTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,

            // 404 Not Found
            AppError::PaymentNotFound { .. }
            | AppError::SessionNotFound { .. }
            | AppError::ClientNotFound { .. } => StatusCode::NOT_FOUND,

            // 409 Conflict
            AppError::ContractFinished { .. }
            | AppError::SessionUpdateNotAllowed { .. }
            | AppError::ClientHasSessions { .. } => StatusCode::CONFLICT,

            // 429 Too Many Requests
            AppError::RateLimited { .. } => StatusCode::TOO_MANY_REQUESTS,

            // 500 Internal Server Error
            AppError::Database(_)
            | AppError::DatabaseConnection { .. }
            | AppError::Internal { .. }
            | AppError::Configuration { .. }
            | AppError::Serialization(_)
            | AppError::Other(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Check if this error should be logged at error level
    pub fn is_server_error(&self) -> bool {
        self.status_code().is_server_error()
    }

    /// Check if this error is a client error
    pub fn is_client_error(&self) -> bool {
        self.status_code().is_client_error()
    }
}

/// Structured error body returned by every API endpoint
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ErrorResponse {
    /// Numeric HTTP status
    pub status: u16,
    /// Reason phrase, e.g. "Not Found"
    pub error: String,
    pub code: ErrorCode,
    pub message: String,
    /// RFC 3339 UTC timestamp
    pub timestamp: String,
    /// Request path; attached by the gateway once the request URI is known
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,
}

impl ErrorResponse {
    pub fn from_error(err: &AppError) -> Self {
        let status = err.status_code();
        Self {
            status: status.as_u16(),
            error: status.canonical_reason().unwrap_or("Unknown").to_string(),
            code: err.code(),
            message: err.to_string(),
            timestamp: chrono::Utc::now().to_rfc3339(),
            path: None,
        }
    }

    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = ErrorResponse::from_error(&self);
        let status = self.status_code();

        // Log based on severity
        if self.is_server_error() {
            tracing::error!(
                error = %body.message,
                code = ?body.code,
                status = status.as_u16(),
                "Server error"
            );
        } else if self.is_client_error() {
            tracing::warn!(
                error = %body.message,
                code = ?body.code,
                status = status.as_u16(),
                "Client error"
            );
        }

        let mut response = (status, Json(body.clone())).into_response();
        // Kept on the response so middleware can re-render it with the path
        response.extensions_mut().insert(body);
        response
    }
}

impl From<std::io::Error> for AppError {
    fn from(err: std::io::Error) -> Self {
        AppError::Internal {
            message: err.to_string(),
        }
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        AppError::Configuration {
            message: err.to_string(),
        }
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(err: validator::ValidationErrors) -> Self {
        let field = err.field_errors().keys().next().map(|f| f.to_string());
        AppError::Validation {
            message: err.to_string(),
            field,
        }
    }
}
