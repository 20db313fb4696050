use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use service::auth::errors::AuthError;
use thiserror::Error;
use tracing::{debug, error};

/// HTTP error with a `{error, message}` body.
#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub error: &'static str,
    pub message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, error: &'static str, message: impl Into<String>) -> Self {
        Self { status, error, message: message.into() }
    }

    pub fn incomplete(message: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, "Datos incompletos", message)
    }

    /// 500 with a generic message; the cause must be logged by the caller.
    pub fn internal() -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            "Error interno del servidor",
            "Ha ocurrido un error inesperado",
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = serde_json::json!({"error": self.error, "message": self.message});
        (self.status, Json(body)).into_response()
    }
}

impl From<AuthError> for ApiError {
    fn from(e: AuthError) -> Self {
        let code = e.code();
        match e {
            AuthError::Validation(msg) => Self::incomplete(msg),
            AuthError::InvalidCredentials => Self::new(
                StatusCode::UNAUTHORIZED,
                "Credenciales inválidas",
                "Usuario o contraseña incorrectos",
            ),
            AuthError::UsernameTaken => Self::new(
                StatusCode::CONFLICT,
                "Usuario existente",
                "El nombre de usuario ya está en uso",
            ),
            AuthError::EmailTaken => {
                Self::new(StatusCode::CONFLICT, "Email existente", "El email ya está registrado")
            }
            AuthError::Storage(cause) => {
                error!(code, error = %cause, "user store failure");
                Self::internal()
            }
        }
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        debug!(error = %rejection.body_text(), "rejected request body");
        Self::incomplete("El cuerpo de la petición debe ser un objeto JSON válido")
    }
}

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("runtime check failed: {0}")]
    Runtime(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use service::errors::ServiceError;

    #[test]
    fn maps_auth_errors_to_status() {
        let cases = [
            (AuthError::Validation("x".into()), StatusCode::BAD_REQUEST),
            (AuthError::InvalidCredentials, StatusCode::UNAUTHORIZED),
            (AuthError::UsernameTaken, StatusCode::CONFLICT),
            (AuthError::EmailTaken, StatusCode::CONFLICT),
            (
                AuthError::Storage(ServiceError::Unavailable("disk".into())),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
        ];
        for (err, status) in cases {
            assert_eq!(ApiError::from(err).status, status);
        }
    }

    #[test]
    fn internal_error_hides_cause() {
        let api = ApiError::from(AuthError::Storage(ServiceError::Unavailable("secret path".into())));
        assert!(!api.message.contains("secret"));
    }
}
