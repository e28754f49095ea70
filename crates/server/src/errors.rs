use thiserror::Error;

use service::auth::AuthError;

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error(transparent)]
    Any(#[from] anyhow::Error),
}

impl From<AuthError> for StartupError {
    fn from(e: AuthError) -> Self {
        StartupError::InvalidConfig(e.to_string())
    }
}
