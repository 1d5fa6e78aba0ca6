/*
 * Responsibility
 * - Config読み込み → 依存生成 → Router 組み立て
 * - pipeline (error guard / token gate / audit) と transport middleware の適用
 * - axum::serve() で起動
 */
use std::{panic, sync::Arc};

use anyhow::Result;
use axum::{Router, routing::get};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::api;
use crate::api::v1::handlers::fallback;
use crate::config::Config;
use crate::middleware;
use crate::repos::UserRepo;
use crate::services::auth::{CredentialTable, TokenCodec};
use crate::state::AppState;

fn init_tracing() {
    // Prefer RUST_LOG if set; otherwise use a sensible default.
    // Ex:
    // RUST_LOG=info,bearer_pipeline=debug,tower_http=debug cargo run
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info,tower_http=info"));

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

fn init_panic_hook() {
    // Surface panics via tracing so they don't get "lost"; the error guard
    // turns them into 500s and the process keeps serving.
    let default_hook = panic::take_hook();

    panic::set_hook(Box::new(move |info| {
        tracing::error!(%info, "panic");
        default_hook(info);
    }))
}

pub async fn run() -> Result<()> {
    init_tracing();
    init_panic_hook();

    let config = Config::from_env()?;

    tracing::info!(
        "starting API in {:?} mode on {}",
        config.app_env,
        config.addr
    );

    let state = build_state(&config)?;
    let app = build_router(state, &config);

    let listener = tokio::net::TcpListener::bind(config.addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

/// Build process-level services and inject them into the shared state.
pub fn build_state(config: &Config) -> Result<AppState> {
    let tokens = TokenCodec::new(config.token.clone())?;
    tracing::debug!(policy = ?tokens.policy(), "token codec ready");

    Ok(AppState::new(
        Arc::new(tokens),
        Arc::new(CredentialTable::builtin()),
        UserRepo::seeded(),
        config.audit,
    ))
}

pub fn build_router(state: AppState, config: &Config) -> Router {
    async fn root() -> &'static str {
        "hello world!"
    }

    let router = Router::new()
        .route("/", get(root))
        .route("/health", get(api::v1::handlers::health::health))
        .nest("/api/v1", api::v1::routes())
        .fallback(fallback::not_found)
        .method_not_allowed_fallback(fallback::method_not_allowed)
        .with_state(state.clone());

    let router = middleware::pipeline::apply(router, state);
    middleware::http::apply(router, &config.http)
}
