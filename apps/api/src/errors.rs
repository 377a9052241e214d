use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

use crate::planner::recovery::RecoveryError;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// Every variant is a 500 with a plain-text body naming the stage that failed.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("API key not set in environment variables")]
    Config,

    #[error("Error decoding request body: {0}")]
    Decode(String),

    #[error(transparent)]
    Completion(#[from] RecoveryError),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        match &self {
            AppError::Config => tracing::error!("Rejected request: completion API key is not configured"),
            AppError::Decode(msg) => tracing::error!("Request decode error: {msg}"),
            AppError::Completion(e) => tracing::error!("Completion error: {e}"),
        }

        (StatusCode::INTERNAL_SERVER_ERROR, self.to_string()).into_response()
    }
}
