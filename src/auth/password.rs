//! Password hashing using Argon2.

use argon2::{
    Argon2, PasswordHasher,
    password_hash::{self, PasswordHash, PasswordVerifier, SaltString, rand_core::OsRng},
};

/// Password hashing service using Argon2.
#[derive(Clone, Default)]
pub struct PasswordService {
    argon2: Argon2<'static>,
}

impl PasswordService {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hash a password into a PHC string with a fresh random salt.
    pub fn hash_password(&self, password: &str) -> Result<String, password_hash::Error> {
        let salt = SaltString::generate(&mut OsRng);
        let hash = self.argon2.hash_password(password.as_bytes(), &salt)?;
        Ok(hash.to_string())
    }

    /// Verify a password against a stored hash.
    ///
    /// An unparseable stored hash counts as a mismatch.
    pub fn verify_password(&self, password: &str, hash: &str) -> bool {
        match PasswordHash::new(hash) {
            Ok(parsed) => self
                .argon2
                .verify_password(password.as_bytes(), &parsed)
                .is_ok(),
            Err(_) => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hash_and_verify() {
        let service = PasswordService::new();
        let hash = service.hash_password("hunter2").unwrap();

        assert!(hash.starts_with("$argon2"));
        assert!(service.verify_password("hunter2", &hash));
        assert!(!service.verify_password("hunter3", &hash));
    }

    #[test]
    fn test_hash_is_salted() {
        let service = PasswordService::new();
        let a = service.hash_password("same").unwrap();
        let b = service.hash_password("same").unwrap();
        assert_ne!(a, b);
    }

    #[test]
    fn test_malformed_hash_does_not_verify() {
        let service = PasswordService::new();
        assert!(!service.verify_password("anything", "not-a-phc-string"));
    }
}
