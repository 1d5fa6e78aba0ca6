/*
 * Responsibility
 * - v1 の URL 構造を定義
 * - role が必要な route は route_layer で require_role を掛ける
 * - token 検証自体は pipeline (token gate) 側で全 route に掛かる
 * - method 違いは 405 JSON (fallback::method_not_allowed)
 */
use axum::{
    Router, middleware,
    routing::{get, post},
};

use crate::middleware::auth::{RequiredRole, require_role};
use crate::services::auth::credentials::{ROLE_ADMIN, ROLE_USER};
use crate::state::AppState;

use crate::api::v1::handlers::{
    auth::login,
    fallback::method_not_allowed,
    health::health,
    secure::{admin_data, protected, secure_data, test_error, user_data},
    users::{create_user, delete_user, get_user, list_users, update_user},
};

pub fn routes() -> Router<AppState> {
    let user_only = Router::new()
        .route("/secure/user", get(user_data))
        .route_layer(middleware::from_fn_with_state(
            RequiredRole(ROLE_USER),
            require_role,
        ));

    let admin_only = Router::new()
        .route("/secure/admin", get(admin_data))
        .route_layer(middleware::from_fn_with_state(
            RequiredRole(ROLE_ADMIN),
            require_role,
        ));

    Router::new()
        .route("/health", get(health))
        .route("/auth/login", post(login))
        .route("/protected", get(protected))
        .route("/secure", get(secure_data))
        .route("/test-error", get(test_error))
        .route("/users", get(list_users).post(create_user))
        .route(
            "/users/{name}",
            get(get_user).put(update_user).delete(delete_user),
        )
        .merge(user_only)
        .merge(admin_only)
        .method_not_allowed_fallback(method_not_allowed)
}
