/*
 * Responsibility
 * - Router と pipeline に紐づける共有コンテキスト (AppState)
 *   - tokens / credentials は read-only, users だけが共有される可変状態
 * - Clone 前提で持つ (内部は Arc/Clone cheap)
 */
use std::sync::Arc;

use crate::middleware::audit::AuditSettings;
use crate::repos::UserRepo;
use crate::services::auth::{CredentialTable, TokenCodec};

#[derive(Clone, Debug)]
pub struct AppState {
    pub tokens: Arc<TokenCodec>,
    pub credentials: Arc<CredentialTable>,
    pub users: UserRepo,
    pub audit: AuditSettings,
}

impl AppState {
    pub fn new(
        tokens: Arc<TokenCodec>,
        credentials: Arc<CredentialTable>,
        users: UserRepo,
        audit: AuditSettings,
    ) -> Self {
        Self {
            tokens,
            credentials,
            users,
            audit,
        }
    }
}
