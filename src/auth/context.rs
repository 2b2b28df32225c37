//! Request-scoped authenticated identity.

use axum::extract::FromRequestParts;
use http::request::Parts;

use crate::auth::extractor::AuthError;
use crate::types::UserId;

/// Identity proven by a verified bearer token.
///
/// Only the token verifier can construct this value, so holding one is proof
/// that the auth gate ran for the current request. Service operations take it
/// explicitly and scope every store query by [`AuthenticatedUser::user_id`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AuthenticatedUser {
    user_id: UserId,
}

impl AuthenticatedUser {
    pub(crate) fn new(user_id: UserId) -> Self {
        Self { user_id }
    }

    /// Get the authenticated user's ID.
    pub fn user_id(&self) -> UserId {
        self.user_id
    }
}

/// Reads the identity the auth gate stored in request extensions.
///
/// Handlers behind the gate receive it as an argument. On a route the gate
/// does not cover, extraction fails with `MissingToken` instead of
/// yielding an identity.
impl<S> FromRequestParts<S> for AuthenticatedUser
where
    S: Send + Sync,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<AuthenticatedUser>()
            .copied()
            .ok_or(AuthError::MissingToken)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parts_with(user: Option<AuthenticatedUser>) -> Parts {
        let mut request = http::Request::builder().uri("/wishlists").body(()).unwrap();
        if let Some(user) = user {
            request.extensions_mut().insert(user);
        }
        request.into_parts().0
    }

    #[tokio::test]
    async fn test_extracts_identity_set_by_gate() {
        let mut parts = parts_with(Some(AuthenticatedUser::new(UserId::new(5))));

        let user = AuthenticatedUser::from_request_parts(&mut parts, &())
            .await
            .unwrap();
        assert_eq!(user.user_id(), UserId::new(5));
    }

    #[tokio::test]
    async fn test_missing_identity_is_rejected() {
        let mut parts = parts_with(None);

        let result = AuthenticatedUser::from_request_parts(&mut parts, &()).await;
        assert!(matches!(result, Err(AuthError::MissingToken)));
    }
}
