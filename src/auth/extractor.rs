//! Authentication gate for HTTP requests.

use std::fmt;
use std::sync::Arc;

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use chrono::{Duration, Utc};
use http::header;
use serde::Deserialize;
use sha2::{Digest, Sha256};

use crate::auth::context::AuthenticatedUser;
use crate::auth::token::{TokenIssuer, TokenVerifier};

/// Default token lifetime in hours.
pub const DEFAULT_TOKEN_TTL_HOURS: i64 = 24;

/// Number of hash bytes kept in the secret fingerprint.
const FINGERPRINT_BYTES: usize = 8;

/// Authentication configuration.
///
/// The secret is read once at startup and handed to both the issuer and the
/// verifier; nothing mutates it afterwards.
#[derive(Clone, Deserialize)]
#[serde(default)]
pub struct AuthConfig {
    /// HMAC secret used to sign and verify tokens
    pub jwt_secret: String,
    /// Token lifetime in hours
    pub token_ttl_hours: i64,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: String::new(),
            token_ttl_hours: DEFAULT_TOKEN_TTL_HOURS,
        }
    }
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &"<redacted>")
            .field("token_ttl_hours", &self.token_ttl_hours)
            .finish()
    }
}

impl AuthConfig {
    /// Create a config with the given secret and the default lifetime.
    pub fn new(jwt_secret: impl Into<String>) -> Self {
        Self {
            jwt_secret: jwt_secret.into(),
            ..Default::default()
        }
    }

    pub fn with_ttl_hours(mut self, hours: i64) -> Self {
        self.token_ttl_hours = hours;
        self
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.jwt_secret.is_empty() {
            anyhow::bail!("JWT secret is not configured (set WISHLIST_JWT_SECRET or auth.jwt_secret)");
        }
        if self.token_ttl_hours <= 0 {
            anyhow::bail!(
                "token_ttl_hours must be positive, got {}",
                self.token_ttl_hours
            );
        }
        let expiry = Duration::try_hours(self.token_ttl_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl));
        if expiry.is_none() {
            anyhow::bail!(
                "token_ttl_hours of {} is out of range",
                self.token_ttl_hours
            );
        }
        Ok(())
    }

    /// Truncated SHA-256 of the secret, safe to log.
    pub fn secret_fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.jwt_secret.as_bytes());
        let result = hasher.finalize();
        result[..FINGERPRINT_BYTES]
            .iter()
            .map(|b| format!("{:02x}", b))
            .collect()
    }

    pub fn issuer(&self) -> TokenIssuer {
        TokenIssuer::new(self)
    }

    pub fn verifier(&self) -> TokenVerifier {
        TokenVerifier::new(self)
    }
}

/// Authentication errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// No `Authorization: Bearer` header on a protected request
    MissingToken,
    /// Bad signature, expired, or malformed claims
    InvalidToken,
    /// The signing primitive itself failed
    SigningFailure(String),
}

impl fmt::Display for AuthError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingToken => write!(f, "missing token"),
            Self::InvalidToken => write!(f, "invalid token"),
            Self::SigningFailure(msg) => write!(f, "token signing failed: {}", msg),
        }
    }
}

impl std::error::Error for AuthError {}

/// Authentication extractor for HTTP requests.
pub struct AuthExtractor {
    verifier: TokenVerifier,
}

impl AuthExtractor {
    /// Create a new auth extractor.
    pub fn new(verifier: TokenVerifier) -> Self {
        Self { verifier }
    }

    /// Resolve the caller's identity from the raw `Authorization` header value.
    pub fn extract_user(&self, authorization: Option<&str>) -> Result<AuthenticatedUser, AuthError> {
        let token = authorization
            .and_then(|h| h.strip_prefix("Bearer "))
            .ok_or(AuthError::MissingToken)?;

        self.verifier.verify(token.trim())
    }
}

/// Middleware guarding protected routes.
///
/// On success the verified identity is inserted into request extensions,
/// where the [`AuthenticatedUser`] extractor picks it up. On failure the
/// request is answered with 401 and never reaches a handler.
pub async fn require_auth(
    State(extractor): State<Arc<AuthExtractor>>,
    mut req: Request,
    next: Next,
) -> Result<Response, AuthError> {
    let authorization = req
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok());

    let user = extractor.extract_user(authorization)?;
    req.extensions_mut().insert(user);

    Ok(next.run(req).await)
}
