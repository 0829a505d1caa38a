//! Unified error handling for the broker simulator
//!
//! `AppError` is the one place where an error kind is mapped to an HTTP
//! status. Missing brokers, instances and bindings are not-found kinds;
//! catalog validation failures fall through to a server error. Domain store
//! messages are passed through verbatim.

use crate::repository::StoreError;
use crate::service::BrokerStoreError;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Application-wide result type
pub type Result<T> = std::result::Result<T, AppError>;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Bad request: {0}")]
    BadRequest(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    /// An error that carries its own HTTP status.
    #[error("{message}")]
    Status { status: StatusCode, message: String },

    #[error(transparent)]
    Broker(#[from] BrokerStoreError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::NotFound(_)
            | AppError::Broker(
                BrokerStoreError::BrokerNotFound(_)
                | BrokerStoreError::InstanceNotFound(_)
                | BrokerStoreError::BindingNotFound(_),
            ) => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::Status { status, .. } => *status,
            AppError::Broker(BrokerStoreError::Store(e)) | AppError::Store(e) => {
                store_status(e)
            }
            AppError::Broker(_) | AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_type(&self) -> &'static str {
        match self {
            AppError::NotFound(_)
            | AppError::Broker(
                BrokerStoreError::BrokerNotFound(_)
                | BrokerStoreError::InstanceNotFound(_)
                | BrokerStoreError::BindingNotFound(_),
            ) => "not_found",
            AppError::BadRequest(_) => "bad_request",
            AppError::Unauthorized(_) => "unauthorized",
            AppError::Conflict(_) => "conflict",
            AppError::Status { .. } => "status",
            AppError::Broker(BrokerStoreError::Store(e)) | AppError::Store(e) => match e {
                StoreError::AlreadyExists(_) => "conflict",
                StoreError::NotFound(_) => "not_found",
            },
            AppError::Broker(_) => "broker_error",
            AppError::Internal(_) => "internal_error",
        }
    }
}

fn store_status(err: &StoreError) -> StatusCode {
    match err {
        StoreError::AlreadyExists(_) => StatusCode::CONFLICT,
        StoreError::NotFound(_) => StatusCode::NOT_FOUND,
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let message = match &self {
            AppError::NotFound(msg)
            | AppError::BadRequest(msg)
            | AppError::Unauthorized(msg)
            | AppError::Conflict(msg) => msg.clone(),
            AppError::Status { message, .. } => message.clone(),
            AppError::Broker(e) => e.to_string(),
            AppError::Store(e) => e.to_string(),
            AppError::Internal(e) => {
                tracing::error!("Internal error: {:?}", e);
                "An internal error occurred".to_string()
            }
        };

        if status.is_server_error() {
            tracing::warn!(status = %status, "{}", message);
        }

        let body = Json(ErrorResponse {
            error: self.error_type().to_string(),
            message,
        });

        (status, body).into_response()
    }
}

// Conversion from validation errors
impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AppError::BadRequest(errors.to_string())
    }
}
