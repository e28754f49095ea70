//! `/api/user` handlers.
//!
//! Every outcome, including infrastructure faults, is answered with HTTP 200
//! and a `{success, message, token?}` envelope. [`ApiResponse::from_result`]
//! is the single place where an `AuthError` becomes caller-facing text.

use std::sync::Arc;

use axum::{extract::{rejection::JsonRejection, State}, Json};
use serde::{Deserialize, Serialize};
use tracing::{error, warn};

use service::auth::{
    domain::{AuthSession, LoginInput, RegisterInput},
    repository::UserRepository,
    validation::MIN_PASSWORD_LEN,
    AuthError, AuthService,
};

#[derive(Clone)]
pub struct ServerState {
    pub auth: Arc<AuthService<dyn UserRepository>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthOperation {
    Register,
    Login,
}

impl AuthOperation {
    fn name(self) -> &'static str {
        match self {
            AuthOperation::Register => "register",
            AuthOperation::Login => "login",
        }
    }

    fn success_message(self) -> &'static str {
        match self {
            AuthOperation::Register => "User registered successfully",
            AuthOperation::Login => "Logged in successfully",
        }
    }

    fn internal_error_message(self) -> &'static str {
        match self {
            AuthOperation::Register => "Internal Server Error during registration",
            AuthOperation::Login => "Internal Server Error during login",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse {
    pub success: bool,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl ApiResponse {
    fn failure(message: impl Into<String>) -> Self {
        Self { success: false, message: message.into(), token: None }
    }

    pub fn from_result(op: AuthOperation, result: Result<AuthSession, AuthError>) -> Self {
        match result {
            Ok(session) => Self {
                success: true,
                message: op.success_message().to_string(),
                token: Some(session.token),
            },
            Err(AuthError::UserExists) => Self::failure("User already exists"),
            Err(AuthError::InvalidEmail) => Self::failure("Please enter a valid email"),
            Err(AuthError::WeakPassword) => {
                Self::failure(format!("Password must be at least {MIN_PASSWORD_LEN} characters long"))
            }
            // same text for unknown email and wrong password
            Err(AuthError::InvalidCredentials) => Self::failure("Invalid email or password"),
            Err(e) => {
                error!(operation = op.name(), code = e.code(), error = %e, "auth operation failed");
                Self::failure(op.internal_error_message())
            }
        }
    }

    fn rejected(op: AuthOperation, rejection: &JsonRejection) -> Self {
        warn!(operation = op.name(), error = %rejection, "unreadable request body");
        Self::failure(op.internal_error_message())
    }
}

#[utoipa::path(post, path = "/api/user/register", tag = "user", request_body = crate::openapi::RegisterRequest, responses((status = 200, description = "Envelope; check `success`", body = crate::openapi::AuthResponse)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Json<ApiResponse> {
    let op = AuthOperation::Register;
    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return Json(ApiResponse::rejected(op, &rejection)),
    };
    Json(ApiResponse::from_result(op, state.auth.register(input).await))
}

#[utoipa::path(post, path = "/api/user/login", tag = "user", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Envelope; check `success`", body = crate::openapi::AuthResponse)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Json<ApiResponse> {
    let op = AuthOperation::Login;
    let Json(input) = match payload {
        Ok(p) => p,
        Err(rejection) => return Json(ApiResponse::rejected(op, &rejection)),
    };
    Json(ApiResponse::from_result(op, state.auth.login(input).await))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn session() -> AuthSession {
        AuthSession { user_id: Default::default(), token: "tok".into() }
    }

    #[test]
    fn success_carries_token() {
        let r = ApiResponse::from_result(AuthOperation::Login, Ok(session()));
        assert!(r.success);
        assert_eq!(r.message, "Logged in successfully");
        assert_eq!(r.token.as_deref(), Some("tok"));
    }

    #[test]
    fn internal_faults_are_generic_per_operation() {
        let r = ApiResponse::from_result(AuthOperation::Register, Err(AuthError::Repository("connection refused".into())));
        assert!(!r.success);
        assert_eq!(r.message, "Internal Server Error during registration");
        assert!(!r.message.contains("connection refused"));

        let r = ApiResponse::from_result(AuthOperation::Login, Err(AuthError::HashError("bad phc".into())));
        assert_eq!(r.message, "Internal Server Error during login");
    }

    #[test]
    fn failure_omits_token_field() {
        let r = ApiResponse::from_result(AuthOperation::Login, Err(AuthError::InvalidCredentials));
        let json = serde_json::to_value(&r).unwrap();
        assert_eq!(json, serde_json::json!({"success": false, "message": "Invalid email or password"}));
    }

    #[test]
    fn weak_password_message_names_minimum() {
        let r = ApiResponse::from_result(AuthOperation::Register, Err(AuthError::WeakPassword));
        assert_eq!(r.message, "Password must be at least 8 characters long");
    }
}
