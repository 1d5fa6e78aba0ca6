/*
 * Responsibility
 * - Issue HS256-signed, time-bounded claims tokens
 * - Verify signature / algorithm / expiry and return the embedded claims
 * - Key material is loaded once from Config and never printed
 */
use std::{fmt, str::FromStr, time::Duration};

use jsonwebtoken::{
    Algorithm, DecodingKey, EncodingKey, Header, Validation, errors::ErrorKind,
};
use serde::{Deserialize, Serialize};
use thiserror::Error;

const ALGORITHM: Algorithm = Algorithm::HS256;

/// Claims carried by an access token.
///
/// `iss` / `aud` are only present when the codec was configured with them.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    pub iat: i64,
    pub exp: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub iss: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub aud: Option<String>,
}

#[derive(Debug, Error)]
pub enum TokenError {
    #[error("malformed token")]
    Malformed,
    #[error("token signature mismatch")]
    BadSignature,
    #[error("token has expired")]
    Expired,
    #[error("token algorithm is not accepted")]
    DisallowedAlgorithm,
    #[error("issuer or audience mismatch")]
    ClaimMismatch,
    #[error("subject must not be empty")]
    EmptySubject,
    #[error("token lifetime out of range")]
    InvalidTtl,
    #[error("token codec misconfigured: {0}")]
    Misconfigured(&'static str),
    #[error("failed to sign token")]
    Signing(#[source] jsonwebtoken::errors::Error),
}

/// How much of the registered claim set is checked on verify.
///
/// Role checks are not part of this: they always run in the role gate.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ValidationPolicy {
    /// Signature and lifetime only. `iss` / `aud` are carried but not checked.
    #[default]
    Lenient,
    /// Signature, lifetime, and exact `iss` / `aud` match.
    Strict,
}

impl FromStr for ValidationPolicy {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "lenient" => Ok(Self::Lenient),
            "strict" => Ok(Self::Strict),
            _ => Err(()),
        }
    }
}

#[derive(Clone)]
pub struct TokenSettings {
    pub secret: String,
    pub ttl: Duration,
    pub issuer: Option<String>,
    pub audience: Option<String>,
    pub policy: ValidationPolicy,
}

impl fmt::Debug for TokenSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // Do not print key material
        f.debug_struct("TokenSettings")
            .field("ttl", &self.ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("policy", &self.policy)
            .finish()
    }
}

#[derive(Clone)]
pub struct TokenCodec {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    validation: Validation,
    default_ttl: Duration,
    issuer: Option<String>,
    audience: Option<String>,
    policy: ValidationPolicy,
}

impl fmt::Debug for TokenCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenCodec")
            .field("default_ttl", &self.default_ttl)
            .field("issuer", &self.issuer)
            .field("audience", &self.audience)
            .field("policy", &self.policy)
            .finish()
    }
}

impl TokenCodec {
    pub fn new(settings: TokenSettings) -> Result<Self, TokenError> {
        if settings.secret.is_empty() {
            return Err(TokenError::Misconfigured("secret is empty"));
        }

        let mut validation = Validation::new(ALGORITHM);
        // Expiry is checked by `verify_at` with zero skew.
        validation.validate_exp = false;
        validation.leeway = 0;

        match settings.policy {
            ValidationPolicy::Lenient => {
                validation.validate_aud = false;
                validation.set_required_spec_claims(&["exp", "sub"]);
            }
            ValidationPolicy::Strict => {
                let issuer = settings
                    .issuer
                    .as_deref()
                    .ok_or(TokenError::Misconfigured("strict policy requires an issuer"))?;
                let audience = settings
                    .audience
                    .as_deref()
                    .ok_or(TokenError::Misconfigured("strict policy requires an audience"))?;
                validation.set_issuer(&[issuer]);
                validation.set_audience(&[audience]);
                validation.validate_aud = true;
                validation.set_required_spec_claims(&["exp", "sub", "iss", "aud"]);
            }
        }

        let secret = settings.secret.as_bytes();

        Ok(Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            validation,
            default_ttl: settings.ttl,
            issuer: settings.issuer,
            audience: settings.audience,
            policy: settings.policy,
        })
    }

    pub fn default_ttl(&self) -> Duration {
        self.default_ttl
    }

    pub fn policy(&self) -> ValidationPolicy {
        self.policy
    }

    pub fn issue(&self, subject: &str, role: Option<&str>, ttl: Duration) -> Result<String, TokenError> {
        self.issue_at(subject, role, ttl, chrono::Utc::now().timestamp())
    }

    /// Issue a token as if the clock read `now` (unix seconds).
    pub fn issue_at(
        &self,
        subject: &str,
        role: Option<&str>,
        ttl: Duration,
        now: i64,
    ) -> Result<String, TokenError> {
        if subject.trim().is_empty() {
            return Err(TokenError::EmptySubject);
        }

        let ttl = i64::try_from(ttl.as_secs()).map_err(|_| TokenError::InvalidTtl)?;
        let exp = now.checked_add(ttl).ok_or(TokenError::InvalidTtl)?;

        let claims = Claims {
            sub: subject.to_string(),
            role: role.map(str::to_string),
            iat: now,
            exp,
            iss: self.issuer.clone(),
            aud: self.audience.clone(),
        };

        let mut header = Header::new(ALGORITHM);
        header.typ = Some("JWT".to_string());

        jsonwebtoken::encode(&header, &claims, &self.encoding_key).map_err(TokenError::Signing)
    }

    pub fn verify(&self, token: &str) -> Result<Claims, TokenError> {
        self.verify_at(token, chrono::Utc::now().timestamp())
    }

    /// Verify a token as if the clock read `now` (unix seconds).
    ///
    /// A token is expired once `now >= exp`.
    pub fn verify_at(&self, token: &str, now: i64) -> Result<Claims, TokenError> {
        let data = jsonwebtoken::decode::<Claims>(token, &self.decoding_key, &self.validation)
            .map_err(classify)?;
        let claims = data.claims;

        if claims.sub.trim().is_empty() {
            return Err(TokenError::Malformed);
        }
        if claims.exp <= now {
            return Err(TokenError::Expired);
        }

        Ok(claims)
    }
}

fn classify(err: jsonwebtoken::errors::Error) -> TokenError {
    match err.kind() {
        ErrorKind::InvalidSignature => TokenError::BadSignature,
        ErrorKind::InvalidAlgorithm => TokenError::DisallowedAlgorithm,
        ErrorKind::ExpiredSignature => TokenError::Expired,
        ErrorKind::InvalidIssuer | ErrorKind::InvalidAudience => TokenError::ClaimMismatch,
        ErrorKind::MissingRequiredClaim(claim) if claim == "iss" || claim == "aud" => {
            TokenError::ClaimMismatch
        }
        _ => TokenError::Malformed,
    }
}
