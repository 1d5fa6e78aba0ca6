/*
 * Responsibility
 * - token gate を通過したリクエストだけが届く handler 群
 * - role 判定は routes.rs の route_layer 側 (handler は結果だけ返す)
 */
use axum::Json;
use serde::Serialize;

use crate::api::v1::extractors::AuthCtxExtractor;
use crate::error::AppError;

#[derive(Debug, Serialize)]
pub struct SecureResponse {
    pub message: &'static str,
    pub subject: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
}

pub async fn protected() -> &'static str {
    "Access granted to protected resource!"
}

pub async fn secure_data(AuthCtxExtractor(ctx): AuthCtxExtractor) -> Json<SecureResponse> {
    Json(SecureResponse {
        message: "This is a secure endpoint.",
        subject: ctx.subject,
        role: ctx.role,
    })
}

pub async fn user_data() -> &'static str {
    "This is User data"
}

pub async fn admin_data() -> &'static str {
    "This is Admin data"
}

/// Always faults; exercises error containment end to end.
pub async fn test_error() -> Result<&'static str, AppError> {
    Err(anyhow::anyhow!("Simulated error for testing!").into())
}
