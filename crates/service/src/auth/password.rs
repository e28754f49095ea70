//! Salted one-way password hashing (Argon2id, PHC string output).
//!
//! Hashing is CPU bound, so both operations hop onto tokio's blocking pool
//! and never stall the executor threads serving other requests.

use argon2::{
    password_hash::{self, PasswordHasher as _, PasswordVerifier as _, SaltString},
    Algorithm, Argon2, Params, PasswordHash, Version,
};
use configs::AuthSettings;
use rand::rngs::OsRng;

use super::errors::AuthError;

#[derive(Clone)]
pub struct PasswordHasher {
    argon: Argon2<'static>,
}

impl PasswordHasher {
    /// `memory_kib`, `iterations` and `parallelism` form the work factor.
    pub fn new(memory_kib: u32, iterations: u32, parallelism: u32) -> Result<Self, AuthError> {
        let params = Params::new(memory_kib, iterations, parallelism, None)
            .map_err(|e| AuthError::HashError(e.to_string()))?;
        Ok(Self { argon: Argon2::new(Algorithm::Argon2id, Version::V0x13, params) })
    }

    pub fn from_settings(settings: &AuthSettings) -> Result<Self, AuthError> {
        Self::new(settings.hash_memory_kib, settings.hash_iterations, settings.hash_parallelism)
    }

    pub async fn hash(&self, password: &str) -> Result<String, AuthError> {
        let argon = self.argon.clone();
        let password = password.to_owned();
        tokio::task::spawn_blocking(move || {
            let salt = SaltString::generate(&mut OsRng);
            argon
                .hash_password(password.as_bytes(), &salt)
                .map(|h| h.to_string())
                .map_err(|e| AuthError::HashError(e.to_string()))
        })
        .await
        .map_err(|e| AuthError::HashError(e.to_string()))?
    }

    /// `Ok(false)` on mismatch; `Err` only when the stored hash is unusable.
    pub async fn verify(&self, password: &str, stored_hash: &str) -> Result<bool, AuthError> {
        let argon = self.argon.clone();
        let password = password.to_owned();
        let stored_hash = stored_hash.to_owned();
        tokio::task::spawn_blocking(move || {
            let parsed = PasswordHash::new(&stored_hash).map_err(|e| AuthError::HashError(e.to_string()))?;
            match argon.verify_password(password.as_bytes(), &parsed) {
                Ok(()) => Ok(true),
                Err(password_hash::Error::Password) => Ok(false),
                Err(e) => Err(AuthError::HashError(e.to_string())),
            }
        })
        .await
        .map_err(|e| AuthError::HashError(e.to_string()))?
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cheap() -> PasswordHasher {
        PasswordHasher::new(1024, 1, 1).unwrap()
    }

    #[tokio::test]
    async fn hash_is_salted_and_verifies() {
        let hasher = cheap();
        let a = hasher.hash("password1").await.unwrap();
        let b = hasher.hash("password1").await.unwrap();
        assert_ne!(a, b);
        assert!(a.starts_with("$argon2id$"));
        assert!(!a.contains("password1"));
        assert!(hasher.verify("password1", &a).await.unwrap());
        assert!(hasher.verify("password1", &b).await.unwrap());
    }

    #[tokio::test]
    async fn wrong_password_is_false_not_error() {
        let hasher = cheap();
        let h = hasher.hash("password1").await.unwrap();
        assert!(!hasher.verify("wrong", &h).await.unwrap());
    }

    #[tokio::test]
    async fn garbage_hash_is_error() {
        let hasher = cheap();
        assert!(matches!(hasher.verify("x", "not-a-phc-string").await, Err(AuthError::HashError(_))));
    }

    #[test]
    fn rejects_invalid_work_factor() {
        assert!(PasswordHasher::new(1, 1, 1).is_err());
    }
}
