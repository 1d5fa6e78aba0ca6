//! The request pipeline: error containment → token gate → audit logger.
//!
//! Stages are registered once, here, in this order. `ServiceBuilder` runs the
//! first registered layer outermost, so every request walks the stages in
//! exactly the listed order, and any stage may short-circuit the rest.

use axum::{Router, middleware};
use tower::ServiceBuilder;
use tower_http::catch_panic::CatchPanicLayer;

use crate::middleware::{audit, auth::token_gate, error_guard};
use crate::state::AppState;

pub fn apply(router: Router, state: AppState) -> Router {
    let stages = ServiceBuilder::new()
        // 1. error containment (panics are caught just inside it)
        .layer(middleware::from_fn(error_guard::contain))
        .layer(CatchPanicLayer::custom(error_guard::panic_to_fault))
        // 2. token gate
        .layer(middleware::from_fn_with_state(
            state.clone(),
            token_gate::authenticate,
        ))
        // 3. audit logger
        .layer(middleware::from_fn_with_state(state.audit, audit::record));

    router.layer(stages)
}
