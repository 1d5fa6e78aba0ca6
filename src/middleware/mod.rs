/*
 * Responsibility
 * - middleware の公開インターフェース
 * - pipeline: error_guard → auth::token_gate → audit (順序は pipeline.rs で固定)
 * - auth::role: route 単位の role 判定
 * - http: transport 層 (request id / trace / limit / timeout)
 */
pub mod audit;
pub mod auth;
pub mod error_guard;
pub mod http;
pub mod pipeline;
