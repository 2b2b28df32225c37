use tracing::{debug, error, info};

use crate::auth::{IssuedToken, PasswordService, TokenIssuer};
use crate::error::{ServiceError, ServiceResult};
use crate::model::{NewUser, UserSummary};
use crate::store::{CredentialStore, StoreError};

/// Registration, login and operator listing of users.
#[derive(Clone)]
pub struct UserService<S> {
    store: S,
    passwords: PasswordService,
    issuer: TokenIssuer,
}

impl<S: CredentialStore> UserService<S> {
    pub fn new(store: S, issuer: TokenIssuer) -> Self {
        Self {
            store,
            passwords: PasswordService::new(),
            issuer,
        }
    }

    /// Create a user with a freshly hashed password.
    pub async fn register(&self, username: &str, password: &str) -> ServiceResult<UserSummary> {
        let username = username.trim();
        if username.is_empty() {
            return Err(ServiceError::Validation("username must not be empty".to_string()));
        }
        if password.is_empty() {
            return Err(ServiceError::Validation("password must not be empty".to_string()));
        }

        let password_hash = self.passwords.hash_password(password).map_err(|e| {
            error!("Password hashing failed: {}", e);
            ServiceError::Internal(e.to_string())
        })?;

        let user = self
            .store
            .insert_user(NewUser {
                username: username.to_string(),
                password_hash,
            })
            .await
            .map_err(|e| match e {
                StoreError::Conflict(_) => {
                    ServiceError::Conflict(format!("username '{}' is already taken", username))
                }
                other => other.into(),
            })?;

        info!("Registered user {} ({})", user.id, user.username);
        Ok(user.into())
    }

    /// Check credentials and issue a bearer token.
    ///
    /// An unknown username and a wrong password are indistinguishable to the
    /// caller.
    pub async fn authenticate(&self, username: &str, password: &str) -> ServiceResult<IssuedToken> {
        let username = username.trim();
        if username.is_empty() || password.is_empty() {
            return Err(ServiceError::Validation(
                "username and password are required".to_string(),
            ));
        }

        let Some(user) = self.store.find_user_by_username(username).await? else {
            debug!("Login failed: unknown user");
            return Err(ServiceError::InvalidCredentials);
        };

        if !self.passwords.verify_password(password, &user.password_hash) {
            debug!("Login failed: bad password for user {}", user.id);
            return Err(ServiceError::InvalidCredentials);
        }

        let token = self.issuer.issue(user.id)?;
        info!("Issued token for user {}", user.id);
        Ok(token)
    }

    pub async fn list_users(&self) -> ServiceResult<Vec<UserSummary>> {
        let users = self.store.list_users().await?;
        Ok(users.into_iter().map(UserSummary::from).collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::AuthConfig;
    use crate::db::SurrealStore;
    use crate::service::test_support::memory_store;

    fn auth_config() -> AuthConfig {
        AuthConfig::new("user-service-secret")
    }

    async fn service() -> UserService<SurrealStore> {
        UserService::new(memory_store().await, auth_config().issuer())
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let users = service().await;

        assert!(matches!(
            users.register("", "x").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            users.register("x", "").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(matches!(
            users.register("   ", "x").await,
            Err(ServiceError::Validation(_))
        ));
        assert!(users.list_users().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_register_duplicate_is_conflict() {
        let users = service().await;

        let first = users.register("dup", "p").await.unwrap();
        assert_eq!(first.username, "dup");

        let second = users.register("dup", "p").await;
        assert!(matches!(second, Err(ServiceError::Conflict(_))));
    }

    #[tokio::test]
    async fn test_authenticate_issues_token_for_registered_user() {
        let users = service().await;
        let alice = users.register("alice", "wonderland").await.unwrap();

        let issued = users.authenticate("alice", "wonderland").await.unwrap();
        let identity = auth_config().verifier().verify(&issued.token).unwrap();

        assert_eq!(identity.user_id(), alice.id);
    }

    #[tokio::test]
    async fn test_authenticate_failures_are_indistinguishable() {
        let users = service().await;
        users.register("alice", "wonderland").await.unwrap();

        let wrong_password = users.authenticate("alice", "nope").await.unwrap_err();
        let unknown_user = users.authenticate("mallory", "wonderland").await.unwrap_err();

        assert_eq!(wrong_password, ServiceError::InvalidCredentials);
        assert_eq!(wrong_password, unknown_user);
    }

    #[tokio::test]
    async fn test_list_users_hides_hashes() {
        let users = service().await;
        users.register("a", "1").await.unwrap();
        users.register("b", "2").await.unwrap();

        let listed = users.list_users().await.unwrap();
        let names: Vec<&str> = listed.iter().map(|u| u.username.as_str()).collect();
        assert_eq!(names, vec!["a", "b"]);

        let json = serde_json::to_string(&listed).unwrap();
        assert!(!json.contains("argon2"));
    }
}
