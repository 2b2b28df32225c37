//! Signed bearer token issuing and verification (HS256 JWT).

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{Algorithm, DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::auth::context::AuthenticatedUser;
use crate::auth::extractor::{AuthConfig, AuthError};
use crate::types::UserId;

/// Claims embedded in every issued token.
///
/// Decoding goes through serde, so a missing or mistyped `user_id` is a
/// decode error rather than a panic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Claims {
    /// Identity the token asserts.
    pub user_id: UserId,
    /// Expiration time (Unix seconds).
    pub exp: i64,
}

/// A freshly signed token plus its expiry instant.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
}

/// Creates signed, time-limited tokens asserting a user identity.
#[derive(Clone)]
pub struct TokenIssuer {
    encoding_key: EncodingKey,
    ttl_hours: i64,
}

impl TokenIssuer {
    /// Create an issuer from the process-wide auth configuration.
    pub fn new(config: &AuthConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.jwt_secret.as_bytes()),
            ttl_hours: config.token_ttl_hours,
        }
    }

    /// Issue a token for `user_id` expiring `ttl` from now.
    pub fn issue(&self, user_id: UserId) -> Result<IssuedToken, AuthError> {
        let expires_at = Duration::try_hours(self.ttl_hours)
            .and_then(|ttl| Utc::now().checked_add_signed(ttl))
            .ok_or_else(|| {
                AuthError::SigningFailure(format!(
                    "token lifetime of {} hours is out of range",
                    self.ttl_hours
                ))
            })?;
        let claims = Claims {
            user_id,
            exp: expires_at.timestamp(),
        };

        let token = encode(&Header::new(Algorithm::HS256), &claims, &self.encoding_key)
            .map_err(|e| AuthError::SigningFailure(e.to_string()))?;

        Ok(IssuedToken { token, expires_at })
    }
}

/// Verifies tokens produced by a [`TokenIssuer`] sharing the same secret.
///
/// Verification is stateless: the credential store is never consulted.
#[derive(Clone)]
pub struct TokenVerifier {
    decoding_key: DecodingKey,
    validation: Validation,
}

impl TokenVerifier {
    pub fn new(config: &AuthConfig) -> Self {
        let mut validation = Validation::new(Algorithm::HS256);
        // Expired means expired; no grace window.
        validation.leeway = 0;
        validation.validate_exp = true;
        validation.set_required_spec_claims(&["exp"]);

        Self {
            decoding_key: DecodingKey::from_secret(config.jwt_secret.as_bytes()),
            validation,
        }
    }

    /// Check signature and expiry, then extract the typed identity claim.
    pub fn verify(&self, token: &str) -> Result<AuthenticatedUser, AuthError> {
        let token_data =
            decode::<Claims>(token, &self.decoding_key, &self.validation).map_err(|e| {
                debug!("Token rejected: {}", e);
                AuthError::InvalidToken
            })?;

        Ok(AuthenticatedUser::new(token_data.claims.user_id))
    }
}
