//! Error taxonomy for service operations.
//!
//! Ownership failures are reported as [`ServiceError::NotFound`]; there is no
//! distinct "forbidden" outcome, so a caller cannot tell whether another
//! user's resource exists.

use std::fmt;

use tracing::error;

use crate::auth::AuthError;
use crate::store::StoreError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    /// Malformed or missing input
    Validation(String),
    /// Unknown username or wrong password
    InvalidCredentials,
    /// Resource absent or owned by someone else
    NotFound,
    /// Uniqueness violated (e.g. username taken)
    Conflict(String),
    /// Store or signing failure
    Internal(String),
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Validation(msg) => write!(f, "{}", msg),
            Self::InvalidCredentials => write!(f, "invalid credentials"),
            Self::NotFound => write!(f, "not found"),
            Self::Conflict(msg) => write!(f, "{}", msg),
            Self::Internal(msg) => write!(f, "internal error: {}", msg),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::Conflict(msg) => Self::Conflict(msg),
            StoreError::Backend(msg) => {
                error!("Store failure: {}", msg);
                Self::Internal(msg)
            }
        }
    }
}

impl From<AuthError> for ServiceError {
    fn from(e: AuthError) -> Self {
        match e {
            AuthError::MissingToken | AuthError::InvalidToken => Self::InvalidCredentials,
            AuthError::SigningFailure(msg) => {
                error!("Token signing failed: {}", msg);
                Self::Internal(msg)
            }
        }
    }
}

pub type ServiceResult<T> = Result<T, ServiceError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_store_errors_map_to_taxonomy() {
        assert_eq!(
            ServiceError::from(StoreError::Conflict("dup".to_string())),
            ServiceError::Conflict("dup".to_string())
        );
        assert!(matches!(
            ServiceError::from(StoreError::Backend("down".to_string())),
            ServiceError::Internal(_)
        ));
    }

    #[test]
    fn test_signing_failure_is_internal() {
        let err = ServiceError::from(AuthError::SigningFailure("bad key".to_string()));
        assert!(matches!(err, ServiceError::Internal(_)));
    }

    #[test]
    fn test_display() {
        assert_eq!(ServiceError::NotFound.to_string(), "not found");
        assert_eq!(
            ServiceError::InvalidCredentials.to_string(),
            "invalid credentials"
        );
        assert_eq!(
            ServiceError::Validation("name required".to_string()).to_string(),
            "name required"
        );
    }
}
