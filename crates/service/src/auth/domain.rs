use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Registration input. Missing JSON fields deserialize as empty strings and
/// fail validation instead of being rejected by the extractor.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterInput {
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Login input
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LoginInput {
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub password: String,
}

/// Stored user as seen by the credential store.
#[derive(Debug, Clone)]
pub struct UserRecord {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Fields needed to insert a user; the store assigns the id.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub name: String,
    pub email: String,
    pub password_hash: String,
}

/// Outcome of a successful register or login.
#[derive(Debug, Clone, Serialize)]
pub struct AuthSession {
    pub user_id: Uuid,
    pub token: String,
}
