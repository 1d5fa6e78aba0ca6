/*
 * Responsibility
 * - route が無い / method が合わない場合も共通の JSON error body で返す
 */
use axum::http::{Method, Uri};

use crate::error::AppError;

pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(format!("No route for '{}'", uri.path()))
}

pub async fn method_not_allowed(method: Method, uri: Uri) -> AppError {
    tracing::debug!(%method, path = %uri.path(), "method not allowed");
    AppError::MethodNotAllowed
}
