/*
 * Responsibility
 * - アプリ共通の AppError 定義
 * - IntoResponse 実装 (HTTP status / JSON error body)
 * - repo error / json rejection / auth error を統一的に変換
 *
 * Unexpected faults are not rendered here: they leave a `Fault` marker on a
 * bare 500 and the error guard stage turns it into the final body.
 */
use axum::{
    Json,
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::repos::error::RepoError;

pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred.";

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ErrorResponse {
    pub error: String,
    pub status_code: u16,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
}

/// Marker left on a response whose handler (or a panic) faulted.
#[derive(Debug, Clone)]
pub struct Fault {
    pub details: String,
}

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0}")]
    InvalidRequest(String),

    #[error("Unauthorized: Invalid token.")]
    Unauthorized,

    #[error("Invalid username or password.")]
    InvalidCredentials,

    #[error("Forbidden: insufficient role.")]
    Forbidden,

    #[error("{0}")]
    NotFound(String),

    #[error("Method not allowed.")]
    MethodNotAllowed,

    #[error("Request timed out.")]
    RequestTimeout,

    #[error("Request body too large.")]
    PayloadTooLarge,

    #[error(transparent)]
    Unexpected(#[from] anyhow::Error),
}

impl AppError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    pub fn status(&self) -> StatusCode {
        match self {
            AppError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized | AppError::InvalidCredentials => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::RequestTimeout => StatusCode::REQUEST_TIMEOUT,
            AppError::PayloadTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            AppError::Unexpected(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Render the JSON body for a contained fault.
pub fn fault_response(details: impl Into<String>) -> Response {
    let body = ErrorResponse {
        error: UNEXPECTED_ERROR_MESSAGE.to_string(),
        status_code: StatusCode::INTERNAL_SERVER_ERROR.as_u16(),
        details: Some(details.into()),
    };

    (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        let message = match self {
            AppError::Unexpected(err) => {
                let mut res = status.into_response();
                res.extensions_mut().insert(Fault {
                    details: err.to_string(),
                });
                return res;
            }
            other => other.to_string(),
        };

        let body = ErrorResponse {
            error: message,
            status_code: status.as_u16(),
            details: None,
        };

        (status, Json(body)).into_response()
    }
}

impl From<RepoError> for AppError {
    fn from(e: RepoError) -> Self {
        match e {
            RepoError::Conflict(_) => AppError::InvalidRequest(e.to_string()),
            RepoError::NotFound(_) => AppError::NotFound(e.to_string()),
        }
    }
}

impl From<JsonRejection> for AppError {
    fn from(e: JsonRejection) -> Self {
        AppError::InvalidRequest(e.body_text())
    }
}
