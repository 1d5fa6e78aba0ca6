//! Bearer token 検証 → AuthCtx を extensions に入れる
//!
//! - `Authorization: Bearer <token>` の `Bearer ` を外してから検証する。
//! - prefix が無い場合も、残りをそのまま token として検証する (明示的な方針)。
//! - 失敗時は 401 を返し、下流 (audit / handler) は一切実行しない。
//! - public path は検証せずに通す。

use axum::{
    extract::{Request, State},
    http::{HeaderMap, header},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;
use crate::state::AppState;

/// Paths that are served without a token.
pub const PUBLIC_PATHS: &[&str] = &["/", "/health", "/api/v1/health", "/api/v1/auth/login"];

const BEARER_PREFIX: &str = "Bearer ";

pub async fn authenticate(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, AppError> {
    if is_public_path(req.uri().path()) {
        return Ok(next.run(req).await);
    }

    let Some(token) = extract_token(req.headers()) else {
        tracing::warn!(path = %req.uri().path(), "missing bearer token");
        return Err(AppError::Unauthorized);
    };

    let claims = match state.tokens.verify(token) {
        Ok(claims) => claims,
        Err(err) => {
            tracing::warn!(
                error = %err,
                path = %req.uri().path(),
                "access token verification failed"
            );
            return Err(AppError::Unauthorized);
        }
    };

    // middleware → extractor への受け渡し
    req.extensions_mut().insert(AuthCtx::from(claims));

    Ok(next.run(req).await)
}

fn is_public_path(path: &str) -> bool {
    PUBLIC_PATHS.contains(&path)
}

/// Extracts the token from the Authorization header.
///
/// The `Bearer ` scheme prefix is optional; an empty token counts as missing.
fn extract_token(headers: &HeaderMap) -> Option<&str> {
    let value = headers.get(header::AUTHORIZATION)?.to_str().ok()?.trim();
    let token = value.strip_prefix(BEARER_PREFIX).unwrap_or(value).trim();

    (!token.is_empty()).then_some(token)
}
