//! Role gate for routes that need a specific role.
//!
//! Runs after the token gate: a missing AuthCtx is 401, a wrong role is 403.
//!
//! ```ignore
//! Router::new()
//!     .route("/secure/admin", get(admin_data))
//!     .route_layer(middleware::from_fn_with_state(
//!         RequiredRole(ROLE_ADMIN),
//!         require_role,
//!     ))
//! ```

use axum::{
    extract::{Request, State},
    middleware::Next,
    response::Response,
};

use crate::api::v1::extractors::AuthCtx;
use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RequiredRole(pub &'static str);

pub async fn require_role(
    State(RequiredRole(required)): State<RequiredRole>,
    req: Request,
    next: Next,
) -> Result<Response, AppError> {
    let ctx = req
        .extensions()
        .get::<AuthCtx>()
        .ok_or(AppError::Unauthorized)?;

    if !ctx.has_role(required) {
        tracing::warn!(
            subject = %ctx.subject,
            role = ctx.role.as_deref().unwrap_or("-"),
            required,
            "role check failed"
        );
        return Err(AppError::Forbidden);
    }

    Ok(next.run(req).await)
}
