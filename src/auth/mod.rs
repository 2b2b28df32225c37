//! Authentication and identity propagation.
//!
//! - **Token issuing**: HS256 JWTs carrying `user_id` and `exp`
//! - **Auth gate**: `require_auth` middleware verifying `Authorization: Bearer`
//! - **Identity carrier**: [`AuthenticatedUser`], inserted by the gate and
//!   passed explicitly into every wishlist operation
//! - **Password hashing**: Argon2
//!
//! ## Security Model
//!
//! - Verification is stateless; possession of a valid, unexpired token is
//!   sufficient proof of identity for its lifetime
//! - There is no revocation; a token outlives any later change to its user
//! - The signing secret is injected once at startup and never rotated
//!
//! ## Usage
//!
//! ```ignore
//! let config = AuthConfig::new(secret);
//! let token = config.issuer().issue(user_id)?;
//! let user = AuthExtractor::new(config.verifier())
//!     .extract_user(Some(&format!("Bearer {}", token.token)))?;
//! ```

mod context;
mod extractor;
mod password;
mod token;

pub use context::AuthenticatedUser;
pub use extractor::{AuthConfig, AuthError, AuthExtractor, DEFAULT_TOKEN_TTL_HOURS, require_auth};
pub use password::PasswordService;
pub use token::{Claims, IssuedToken, TokenIssuer, TokenVerifier};
