use serde::Serialize;
use utoipa::OpenApi;
use utoipa::ToSchema;

// Schema-only mirrors of the wire types; serde renames give the JSON keys.

#[derive(Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
    pub usuarios_registrados: u64,
}

#[derive(Serialize, ToSchema)]
pub struct ErrorResponse {
    pub error: String,
    pub message: String,
}

#[derive(Serialize, ToSchema)]
pub struct LoginRequest {
    pub usuario: String,
    #[serde(rename = "contraseña")]
    pub password: String,
}

#[derive(Serialize, ToSchema)]
pub struct RegisterRequest {
    pub usuario: String,
    #[serde(rename = "contraseña")]
    pub password: String,
    pub email: String,
    pub nombre: Option<String>,
    pub rol: Option<String>,
}

#[derive(Serialize, ToSchema)]
pub struct UserResponse {
    pub id: u64,
    pub usuario: String,
    pub email: String,
    pub nombre: String,
    pub rol: String,
    pub fecha_creacion: String,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        crate::routes::index,
        crate::routes::health,
        crate::routes::auth::login,
        crate::routes::auth::register,
        crate::routes::users::list_users,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorResponse,
            LoginRequest,
            RegisterRequest,
            UserResponse,
        )
    ),
    tags(
        (name = "health"),
        (name = "auth"),
        (name = "users")
    )
)]
pub struct ApiDoc;
