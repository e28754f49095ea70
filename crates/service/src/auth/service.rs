use std::sync::Arc;

use tracing::{debug, info, instrument};

use super::domain::{AuthSession, LoginInput, NewUser, RegisterInput};
use super::errors::AuthError;
use super::password::PasswordHasher;
use super::repository::UserRepository;
use super::token::TokenIssuer;
use super::validation;

/// Auth business service independent of web framework
pub struct AuthService<R: UserRepository + ?Sized> {
    repo: Arc<R>,
    hasher: PasswordHasher,
    tokens: TokenIssuer,
}

impl<R: UserRepository + ?Sized> AuthService<R> {
    pub fn new(repo: Arc<R>, hasher: PasswordHasher, tokens: TokenIssuer) -> Self {
        Self { repo, hasher, tokens }
    }

    pub fn tokens(&self) -> &TokenIssuer {
        &self.tokens
    }

    /// Register a new user and issue a token for them.
    ///
    /// Checks run in order: duplicate email, email grammar, password length.
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, password::PasswordHasher, token::TokenIssuer};
    /// use service::auth::repository::memory::InMemoryUserRepository;
    /// use service::auth::domain::RegisterInput;
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepository::default());
    /// let svc = AuthService::new(repo, PasswordHasher::new(1024, 1, 1).unwrap(), TokenIssuer::new("secret"));
    /// let input = RegisterInput { name: "A".into(), email: "a@x.com".into(), password: "password1".into() };
    /// let session = tokio_test::block_on(svc.register(input)).unwrap();
    /// assert!(!session.token.is_empty());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn register(&self, input: RegisterInput) -> Result<AuthSession, AuthError> {
        if let Some(existing) = self.repo.find_by_email(&input.email).await? {
            debug!(user_id = %existing.id, "user exists");
            return Err(AuthError::UserExists);
        }
        if !validation::is_valid_email(&input.email) {
            return Err(AuthError::InvalidEmail);
        }
        if !validation::is_strong_password(&input.password) {
            return Err(AuthError::WeakPassword);
        }

        let password_hash = self.hasher.hash(&input.password).await?;
        let user = self
            .repo
            .create(NewUser { name: input.name, email: input.email, password_hash })
            .await?;
        let token = self.tokens.issue(user.id)?;

        info!(user_id = %user.id, "user_registered");
        Ok(AuthSession { user_id: user.id, token })
    }

    /// Authenticate a user and issue a token.
    ///
    /// Unknown email and wrong password both yield [`AuthError::InvalidCredentials`].
    ///
    /// # Examples
    /// ```
    /// use service::auth::{AuthService, password::PasswordHasher, token::TokenIssuer};
    /// use service::auth::repository::memory::InMemoryUserRepository;
    /// use service::auth::domain::{RegisterInput, LoginInput};
    /// use std::sync::Arc;
    /// let repo = Arc::new(InMemoryUserRepository::default());
    /// let svc = AuthService::new(repo, PasswordHasher::new(1024, 1, 1).unwrap(), TokenIssuer::new("secret"));
    /// let _ = tokio_test::block_on(svc.register(RegisterInput { name: "N".into(), email: "u@e.com".into(), password: "Passw0rd".into() }));
    /// let session = tokio_test::block_on(svc.login(LoginInput { email: "u@e.com".into(), password: "Passw0rd".into() })).unwrap();
    /// assert_eq!(svc.tokens().decode(&session.token).unwrap().id, session.user_id.to_string());
    /// ```
    #[instrument(skip(self, input), fields(email = %input.email))]
    pub async fn login(&self, input: LoginInput) -> Result<AuthSession, AuthError> {
        let user = self
            .repo
            .find_by_email(&input.email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        if !self.hasher.verify(&input.password, &user.password_hash).await? {
            debug!(user_id = %user.id, "password mismatch");
            return Err(AuthError::InvalidCredentials);
        }

        let token = self.tokens.issue(user.id)?;
        info!(user_id = %user.id, "user_logged_in");
        Ok(AuthSession { user_id: user.id, token })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::domain::UserRecord;
    use crate::auth::repository::memory::InMemoryUserRepository;
    use async_trait::async_trait;

    fn service() -> AuthService<InMemoryUserRepository> {
        AuthService::new(
            Arc::new(InMemoryUserRepository::default()),
            PasswordHasher::new(1024, 1, 1).unwrap(),
            TokenIssuer::new("test-secret"),
        )
    }

    fn register_input(email: &str, password: &str) -> RegisterInput {
        RegisterInput { name: "A".into(), email: email.into(), password: password.into() }
    }

    #[tokio::test]
    async fn duplicate_email_rejected() {
        let svc = service();
        svc.register(register_input("a@x.com", "password1")).await.unwrap();
        let err = svc.register(register_input("a@x.com", "password2")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserExists));
    }

    #[tokio::test]
    async fn duplicate_check_runs_before_validation() {
        let svc = service();
        svc.register(register_input("a@x.com", "password1")).await.unwrap();
        let err = svc.register(register_input("a@x.com", "short")).await.unwrap_err();
        assert!(matches!(err, AuthError::UserExists));
    }

    #[tokio::test]
    async fn password_length_boundary() {
        let svc = service();
        let err = svc.register(register_input("a@x.com", "passwor")).await.unwrap_err();
        assert!(matches!(err, AuthError::WeakPassword));
        svc.register(register_input("a@x.com", "password")).await.unwrap();
    }

    #[tokio::test]
    async fn malformed_email_rejected() {
        let svc = service();
        let err = svc.register(register_input("not-an-email", "password1")).await.unwrap_err();
        assert!(matches!(err, AuthError::InvalidEmail));
    }

    #[tokio::test]
    async fn stored_hash_is_not_plaintext() {
        let repo = Arc::new(InMemoryUserRepository::default());
        let svc = AuthService::new(repo.clone(), PasswordHasher::new(1024, 1, 1).unwrap(), TokenIssuer::new("s"));
        svc.register(register_input("a@x.com", "password1")).await.unwrap();
        let stored = repo.find_by_email("a@x.com").await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "password1");
        assert!(stored.password_hash.starts_with("$argon2id$"));
    }

    #[tokio::test]
    async fn login_after_register_yields_token_for_same_user() {
        let svc = service();
        let reg = svc.register(register_input("a@x.com", "password1")).await.unwrap();
        let login = svc
            .login(LoginInput { email: "a@x.com".into(), password: "password1".into() })
            .await
            .unwrap();
        assert_eq!(login.user_id, reg.user_id);
        assert!(!login.token.is_empty());
        assert_eq!(svc.tokens().decode(&reg.token).unwrap().id, svc.tokens().decode(&login.token).unwrap().id);
    }

    #[tokio::test]
    async fn unknown_email_and_wrong_password_are_indistinguishable() {
        let svc = service();
        svc.register(register_input("a@x.com", "password1")).await.unwrap();
        let wrong = svc
            .login(LoginInput { email: "a@x.com".into(), password: "wrong".into() })
            .await
            .unwrap_err();
        let unknown = svc
            .login(LoginInput { email: "nobody@x.com".into(), password: "password1".into() })
            .await
            .unwrap_err();
        assert!(matches!(wrong, AuthError::InvalidCredentials));
        assert!(matches!(unknown, AuthError::InvalidCredentials));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn concurrent_distinct_registrations_both_succeed() {
        let svc = Arc::new(service());
        let (a, b) = tokio::join!(
            svc.register(register_input("a@x.com", "password1")),
            svc.register(register_input("b@x.com", "password1")),
        );
        assert!(a.is_ok());
        assert!(b.is_ok());
    }

    /// Store that always reports "no such user" so the pre-check passes,
    /// then rejects the insert the way a unique index would.
    struct RacingStore;

    #[async_trait]
    impl UserRepository for RacingStore {
        async fn find_by_email(&self, _email: &str) -> Result<Option<UserRecord>, AuthError> {
            Ok(None)
        }
        async fn create(&self, _user: NewUser) -> Result<UserRecord, AuthError> {
            Err(AuthError::Repository("duplicate key value violates unique constraint".into()))
        }
    }

    #[tokio::test]
    async fn lost_race_surfaces_as_repository_fault() {
        let svc: AuthService<dyn UserRepository> = AuthService::new(
            Arc::new(RacingStore) as Arc<dyn UserRepository>,
            PasswordHasher::new(1024, 1, 1).unwrap(),
            TokenIssuer::new("s"),
        );
        let err = svc.register(register_input("a@x.com", "password1")).await.unwrap_err();
        assert!(matches!(err, AuthError::Repository(_)));
    }
}
