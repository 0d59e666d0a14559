use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::gateway::{is_missing_bucket, GatewayError};

pub const MISSING_BUCKET_MESSAGE: &str =
    "Resume storage is not configured yet. Please contact the site administrator.";

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant renders as a plain-text message: the shell script writes it
/// into the submitting form's error slot, or alerts it when there is none.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not found: {0}")]
    NotFound(String),

    /// Local validation failed; nothing was sent to a gateway.
    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Unauthorized: {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    /// A gateway call failed and the caller already chose the user-facing text.
    #[error("Upstream error: {0}")]
    Upstream(String),

    #[error("Gateway error: {0}")]
    Gateway(#[from] GatewayError),

    #[error("Template error: {0}")]
    Template(#[from] askama::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            AppError::NotFound(msg) => (StatusCode::NOT_FOUND, format!("Not found: {msg}")),
            AppError::Validation(msg) => (StatusCode::UNPROCESSABLE_ENTITY, msg.clone()),
            AppError::Unauthorized(msg) => (StatusCode::UNAUTHORIZED, msg.clone()),
            AppError::Forbidden => (
                StatusCode::FORBIDDEN,
                "Admin access required".to_string(),
            ),
            AppError::Upstream(msg) => {
                tracing::warn!("Upstream failure surfaced to user: {msg}");
                (StatusCode::BAD_GATEWAY, msg.clone())
            }
            AppError::Gateway(GatewayError::Rejected(msg)) => {
                (StatusCode::BAD_REQUEST, msg.clone())
            }
            AppError::Gateway(GatewayError::NotFound(msg)) => {
                (StatusCode::NOT_FOUND, format!("Not found: {msg}"))
            }
            AppError::Gateway(e @ GatewayError::Storage(_)) if is_missing_bucket(e) => {
                tracing::error!("Storage error: {e}");
                (
                    StatusCode::SERVICE_UNAVAILABLE,
                    MISSING_BUCKET_MESSAGE.to_string(),
                )
            }
            AppError::Gateway(GatewayError::Storage(msg)) => {
                tracing::error!("Storage error: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A storage error occurred".to_string(),
                )
            }
            AppError::Gateway(GatewayError::Database(e)) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "A database error occurred".to_string(),
                )
            }
            AppError::Template(e) => {
                tracing::error!("Template error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "The page could not be rendered".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal server error occurred".to_string(),
                )
            }
        };

        (
            status,
            [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
            message,
        )
            .into_response()
    }
}
