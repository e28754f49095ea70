use utoipa::OpenApi;
use utoipa::ToSchema;

#[derive(ToSchema)]
pub struct HealthResponse { pub status: String }

#[derive(ToSchema)]
pub struct RegisterRequest { pub name: String, pub email: String, pub password: String }

#[derive(ToSchema)]
pub struct LoginRequest { pub email: String, pub password: String }

/// Envelope returned by every user endpoint, always with HTTP 200.
#[derive(ToSchema)]
pub struct AuthResponse { pub success: bool, pub message: String, pub token: Option<String> }

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::health,
        crate::routes::user::register,
        crate::routes::user::login,
    ),
    components(
        schemas(
            HealthResponse,
            RegisterRequest,
            LoginRequest,
            AuthResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "user")
    )
)]
pub struct ApiDoc;
