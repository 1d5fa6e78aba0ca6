/*
 * Responsibility
 * - Handler から見える「認証済みコンテキスト」の型
 * - token gate が検証して request extensions に格納し、handler はこの型だけを受け取る
 *
 * Notes
 * - トークン検証ロジックは middleware/services 側の責務
 * - role 比較は大文字小文字を区別する単純な文字列一致
 */
use crate::services::auth::Claims;

/// 認証済みのリクエストに付与されるコンテキスト
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthCtx {
    pub subject: String,
    pub role: Option<String>,
}

impl AuthCtx {
    pub fn new(subject: impl Into<String>, role: Option<String>) -> Self {
        Self {
            subject: subject.into(),
            role,
        }
    }

    pub fn has_role(&self, required: &str) -> bool {
        self.role.as_deref() == Some(required)
    }
}

impl From<Claims> for AuthCtx {
    fn from(claims: Claims) -> Self {
        Self::new(claims.sub, claims.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn role_match_is_exact() {
        let ctx = AuthCtx::new("alice", Some("User".to_string()));
        assert!(ctx.has_role("User"));
        assert!(!ctx.has_role("user"));
        assert!(!ctx.has_role("Admin"));
        assert!(!AuthCtx::new("bob", None).has_role("User"));
    }
}
