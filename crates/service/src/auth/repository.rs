use async_trait::async_trait;

use super::domain::{NewUser, UserRecord};
use super::errors::AuthError;

/// Credential store: user records keyed by email.
///
/// Implementations must reject a second record for an email that already
/// exists, even when the caller checked beforehand.
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError>;
    async fn create(&self, user: NewUser) -> Result<UserRecord, AuthError>;
}

/// In-memory store for tests, benches and doc examples
pub mod memory {
    use super::*;
    use std::collections::HashMap;
    use std::sync::Mutex;
    use uuid::Uuid;

    #[derive(Default)]
    pub struct InMemoryUserRepository {
        users: Mutex<HashMap<String, UserRecord>>, // key: email
    }

    fn poisoned<T>(_: T) -> AuthError {
        AuthError::Repository("user store lock poisoned".into())
    }

    #[async_trait]
    impl UserRepository for InMemoryUserRepository {
        async fn find_by_email(&self, email: &str) -> Result<Option<UserRecord>, AuthError> {
            let users = self.users.lock().map_err(poisoned)?;
            Ok(users.get(email).cloned())
        }

        async fn create(&self, user: NewUser) -> Result<UserRecord, AuthError> {
            let mut users = self.users.lock().map_err(poisoned)?;
            if users.contains_key(&user.email) {
                return Err(AuthError::Repository(format!("unique constraint violated: email {}", user.email)));
            }
            let record = UserRecord {
                id: Uuid::new_v4(),
                name: user.name,
                email: user.email,
                password_hash: user.password_hash,
            };
            users.insert(record.email.clone(), record.clone());
            Ok(record)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::memory::InMemoryUserRepository;
    use super::*;

    fn new_user(email: &str) -> NewUser {
        NewUser { name: "A".into(), email: email.into(), password_hash: "$argon2id$stub".into() }
    }

    #[tokio::test]
    async fn create_assigns_id_and_find_returns_it() {
        let repo = InMemoryUserRepository::default();
        let created = repo.create(new_user("a@x.com")).await.unwrap();
        let found = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert!(repo.find_by_email("b@x.com").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn second_insert_for_same_email_fails() {
        let repo = InMemoryUserRepository::default();
        let first = repo.create(new_user("a@x.com")).await.unwrap();
        let err = repo.create(new_user("a@x.com")).await.unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
        let kept = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_eq!(kept.id, first.id);
    }
}
