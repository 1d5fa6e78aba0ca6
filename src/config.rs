/*
 * Responsibility
 * - 環境変数や設定の読み込み (PORT, TOKEN_SECRET, 監査ログ設定など)
 * - 設定値のバリデーション (不足なら起動失敗)
 * - `from_lookup` は env を触らずにテストできる入口
 */
use std::fmt;
use std::net::SocketAddr;
use std::str::FromStr;
use std::time::Duration;

use crate::middleware::{audit::AuditSettings, http::HttpSettings};
use crate::services::auth::{TokenSettings, ValidationPolicy};

const MIN_SECRET_LEN: usize = 32;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppEnv {
    Development,
    Production,
}

impl AppEnv {
    pub fn parse(value: Option<&str>) -> Self {
        match value
            .unwrap_or("development")
            .to_ascii_lowercase()
            .as_str()
        {
            "production" | "prod" => Self::Production,
            _ => Self::Development,
        }
    }

    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

#[derive(Debug, PartialEq, Eq)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str),
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "missing configuration: {}", key),
            ConfigError::Invalid(key) => write!(f, "invalid configuration: {}", key),
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Clone)]
pub struct Config {
    pub addr: SocketAddr,
    pub app_env: AppEnv,
    pub token: TokenSettings,
    pub audit: AuditSettings,
    pub http: HttpSettings,
}

impl Config {
    pub fn from_env() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let port: u16 = lookup("PORT")
            .and_then(|s| s.parse().ok())
            .unwrap_or(3000);

        let addr: SocketAddr = SocketAddr::from_str(&format!("0.0.0.0:{}", port))
            .map_err(|_| ConfigError::Invalid("PORT"))?;

        let app_env = AppEnv::parse(lookup("APP_ENV").as_deref());

        let secret = lookup("TOKEN_SECRET")
            .filter(|s| !s.is_empty())
            .ok_or(ConfigError::Missing("TOKEN_SECRET"))?;
        if secret.len() < MIN_SECRET_LEN {
            tracing::warn!(
                min_len = MIN_SECRET_LEN,
                "TOKEN_SECRET is shorter than recommended"
            );
        }

        let ttl_seconds = match lookup("TOKEN_TTL_SECONDS") {
            Some(v) => v
                .parse::<u64>()
                .ok()
                .filter(|&secs| secs > 0)
                .ok_or(ConfigError::Invalid("TOKEN_TTL_SECONDS"))?,
            None => 1800, // 30 min
        };

        let issuer = lookup("TOKEN_ISSUER").filter(|s| !s.trim().is_empty());
        let audience = lookup("TOKEN_AUDIENCE").filter(|s| !s.trim().is_empty());

        let policy = match lookup("TOKEN_VALIDATION_POLICY") {
            Some(v) => v
                .parse::<ValidationPolicy>()
                .map_err(|_| ConfigError::Invalid("TOKEN_VALIDATION_POLICY"))?,
            None => ValidationPolicy::default(),
        };
        if policy == ValidationPolicy::Strict {
            if issuer.is_none() {
                return Err(ConfigError::Missing("TOKEN_ISSUER"));
            }
            if audience.is_none() {
                return Err(ConfigError::Missing("TOKEN_AUDIENCE"));
            }
        }

        let snapshot_bytes = lookup("AUDIT_BODY_SNAPSHOT_BYTES")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1024);

        let body_limit_bytes = lookup("REQUEST_BODY_LIMIT_BYTES")
            .and_then(|s| s.parse::<usize>().ok())
            .unwrap_or(1024 * 1024);

        let timeout_seconds = lookup("REQUEST_TIMEOUT_SECONDS")
            .and_then(|s| s.parse::<u64>().ok())
            .unwrap_or(30);

        Ok(Self {
            addr,
            app_env,
            token: TokenSettings {
                secret,
                ttl: Duration::from_secs(ttl_seconds),
                issuer,
                audience,
                policy,
            },
            audit: AuditSettings {
                snapshot_bytes,
                body_limit_bytes,
            },
            http: HttpSettings {
                body_limit_bytes,
                timeout: Duration::from_secs(timeout_seconds),
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup<'a>(pairs: &'a [(&'a str, &'a str)]) -> impl Fn(&str) -> Option<String> + 'a {
        let map: HashMap<&str, &str> = pairs.iter().copied().collect();
        move |key: &str| map.get(key).map(|v| v.to_string())
    }

    #[test]
    fn defaults_apply_when_only_the_secret_is_set() {
        let config =
            Config::from_lookup(lookup(&[("TOKEN_SECRET", "0123456789abcdef0123456789abcdef")]))
                .unwrap();

        assert_eq!(config.addr.port(), 3000);
        assert_eq!(config.app_env, AppEnv::Development);
        assert_eq!(config.token.ttl, Duration::from_secs(1800));
        assert_eq!(config.token.policy, ValidationPolicy::Lenient);
        assert_eq!(config.token.issuer, None);
        assert_eq!(config.audit.snapshot_bytes, 1024);
        assert_eq!(config.http.body_limit_bytes, 1024 * 1024);
        assert_eq!(config.http.timeout, Duration::from_secs(30));
    }

    #[test]
    fn secret_is_required() {
        assert_eq!(
            Config::from_lookup(lookup(&[])).unwrap_err(),
            ConfigError::Missing("TOKEN_SECRET")
        );
        assert_eq!(
            Config::from_lookup(lookup(&[("TOKEN_SECRET", "")])).unwrap_err(),
            ConfigError::Missing("TOKEN_SECRET")
        );
    }

    #[test]
    fn strict_policy_needs_issuer_and_audience() {
        let err = Config::from_lookup(lookup(&[
            ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
            ("TOKEN_VALIDATION_POLICY", "strict"),
            ("TOKEN_ISSUER", "bearer-pipeline"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Missing("TOKEN_AUDIENCE"));

        let config = Config::from_lookup(lookup(&[
            ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
            ("TOKEN_VALIDATION_POLICY", "strict"),
            ("TOKEN_ISSUER", "bearer-pipeline"),
            ("TOKEN_AUDIENCE", "api"),
        ]))
        .unwrap();
        assert_eq!(config.token.policy, ValidationPolicy::Strict);
    }

    #[test]
    fn unknown_policy_is_invalid() {
        let err = Config::from_lookup(lookup(&[
            ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
            ("TOKEN_VALIDATION_POLICY", "anything-goes"),
        ]))
        .unwrap_err();
        assert_eq!(err, ConfigError::Invalid("TOKEN_VALIDATION_POLICY"));
    }

    #[test]
    fn zero_or_garbled_ttl_is_invalid() {
        for ttl in ["0", "-5", "soon"] {
            let err = Config::from_lookup(lookup(&[
                ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
                ("TOKEN_TTL_SECONDS", ttl),
            ]))
            .unwrap_err();
            assert_eq!(err, ConfigError::Invalid("TOKEN_TTL_SECONDS"));
        }
    }

    #[test]
    fn overrides_are_read() {
        let config = Config::from_lookup(lookup(&[
            ("TOKEN_SECRET", "0123456789abcdef0123456789abcdef"),
            ("PORT", "8080"),
            ("APP_ENV", "prod"),
            ("TOKEN_TTL_SECONDS", "3600"),
            ("AUDIT_BODY_SNAPSHOT_BYTES", "64"),
        ]))
        .unwrap();

        assert_eq!(config.addr.port(), 8080);
        assert!(config.app_env.is_production());
        assert_eq!(config.token.ttl, Duration::from_secs(3600));
        assert_eq!(config.audit.snapshot_bytes, 64);
    }
}
