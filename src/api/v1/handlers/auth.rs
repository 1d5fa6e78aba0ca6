/*
 * Responsibility
 * - POST /auth/login
 * - credential table で照合 → token codec で発行
 */
use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};

use crate::api::v1::dto::auth::{LoginRequest, LoginResponse};
use crate::error::AppError;
use crate::state::AppState;

pub async fn login(
    State(state): State<AppState>,
    payload: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::invalid_request)?;

    let Some(role) =
        state
            .credentials
            .authenticate(&req.username, &req.password, req.role.as_deref())
    else {
        tracing::warn!(username = %req.username, "login rejected");
        return Err(AppError::InvalidCredentials);
    };

    let ttl = state.tokens.default_ttl();
    let token = state
        .tokens
        .issue(&req.username, Some(role), ttl)
        .map_err(|e| AppError::Unexpected(e.into()))?;

    tracing::info!(username = %req.username, role, "token issued");

    Ok(Json(LoginResponse {
        token,
        token_type: "Bearer",
        expires_in: ttl.as_secs(),
    }))
}
