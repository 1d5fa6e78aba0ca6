/*
 * Responsibility
 * - /users 系 CRUD handler
 * - Path/Json を extractor で受け、DTO validation → repo 呼び出し
 * - users は name (case-insensitive) で識別する
 */
use axum::{
    Json,
    extract::{Path, State, rejection::JsonRejection},
    http::{HeaderValue, StatusCode, header},
};

use crate::{
    api::v1::dto::users::{CreateUserRequest, MessageResponse, UpdateUserRequest, UserResponse},
    error::AppError,
    repos::{User, error::RepoError},
    state::AppState,
};

pub async fn list_users(State(state): State<AppState>) -> Json<Vec<UserResponse>> {
    let users = state.users.list().await;
    Json(users.into_iter().map(UserResponse::from).collect())
}

pub async fn get_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<UserResponse>, AppError> {
    let user = state
        .users
        .get(&name)
        .await
        .ok_or(RepoError::NotFound(name))?;

    Ok(Json(user.into()))
}

pub async fn create_user(
    State(state): State<AppState>,
    payload: Result<Json<CreateUserRequest>, JsonRejection>,
) -> Result<(StatusCode, [(header::HeaderName, HeaderValue); 1], Json<UserResponse>), AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::invalid_request)?;

    // Built before the write so a bad header never leaves a stored user behind.
    let location = HeaderValue::try_from(format!("/api/v1/users/{}", req.name))
        .map_err(|_| AppError::invalid_request("Name cannot be used in a URL."))?;

    let user = state.users.create(User::new(req.name, req.age)).await?;

    Ok((
        StatusCode::CREATED,
        [(header::LOCATION, location)],
        Json(user.into()),
    ))
}

pub async fn update_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
    payload: Result<Json<UpdateUserRequest>, JsonRejection>,
) -> Result<Json<UserResponse>, AppError> {
    let Json(req) = payload?;
    req.validate().map_err(AppError::invalid_request)?;

    let user = state.users.update(&name, req.name, req.age).await?;

    Ok(Json(user.into()))
}

pub async fn delete_user(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<Json<MessageResponse>, AppError> {
    let user = state.users.delete(&name).await?;

    Ok(Json(MessageResponse {
        message: format!("User '{}' deleted successfully", user.name),
    }))
}
