use thiserror::Error;

use super::validation::MIN_PASSWORD_LEN;

/// Business errors for auth workflows
#[derive(Debug, Error)]
pub enum AuthError {
    #[error("user already exists")]
    UserExists,
    #[error("invalid email address")]
    InvalidEmail,
    #[error("password too short (>= {})", MIN_PASSWORD_LEN)]
    WeakPassword,
    #[error("invalid credentials")]
    InvalidCredentials,
    #[error("hashing error: {0}")]
    HashError(String),
    #[error("token error: {0}")]
    TokenError(String),
    #[error("repository error: {0}")]
    Repository(String),
}

impl AuthError {
    /// Stable numeric code for external mapping/logging
    pub fn code(&self) -> u16 {
        match self {
            AuthError::UserExists => 1001,
            AuthError::InvalidEmail => 1002,
            AuthError::WeakPassword => 1003,
            AuthError::InvalidCredentials => 1004,
            AuthError::HashError(_) => 1101,
            AuthError::TokenError(_) => 1102,
            AuthError::Repository(_) => 1200,
        }
    }
}

impl From<models::errors::ModelError> for AuthError {
    fn from(e: models::errors::ModelError) -> Self {
        AuthError::Repository(e.to_string())
    }
}
