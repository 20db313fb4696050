pub mod auth;
pub mod users;

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::Level;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use common::types::{EndpointInfo, Health, ServiceInfo};

use crate::errors::ApiError;
use crate::openapi::ApiDoc;
use auth::ServerState;

#[utoipa::path(get, path = "/health", tag = "health", responses((status = 200, description = "OK", body = crate::openapi::HealthResponse), (status = 500, description = "User store unavailable", body = crate::openapi::ErrorResponse)))]
pub async fn health(State(state): State<ServerState>) -> Result<Json<Health>, ApiError> {
    let count = state.users.count().await?;
    Ok(Json(Health::ok(count)))
}

#[utoipa::path(get, path = "/", tag = "health", responses((status = 200, description = "Service description")))]
pub async fn index() -> Json<ServiceInfo> {
    Json(service_info())
}

fn service_info() -> ServiceInfo {
    let endpoint = |method: &str, path: &str, description: &str| EndpointInfo {
        method: method.into(),
        path: path.into(),
        description: description.into(),
    };
    ServiceInfo {
        service: "auth_api".into(),
        version: env!("CARGO_PKG_VERSION").into(),
        status: "ok".into(),
        endpoints: vec![
            endpoint("POST", "/auth/login", "Autenticación con usuario y contraseña"),
            endpoint("POST", "/auth/registro", "Registro de un nuevo usuario"),
            endpoint("GET", "/api/usuarios", "Listado de usuarios sin contraseñas"),
            endpoint("GET", "/health", "Estado del servidor y usuarios registrados"),
        ],
    }
}

/// Build the full application router: auth, listing, health, and API docs.
pub fn build_router(state: ServerState, cors: CorsLayer) -> Router {
    let api = Router::new()
        .route("/", get(index))
        .route("/health", get(health))
        .route("/auth/login", post(auth::login))
        .route("/auth/registro", post(auth::register))
        .route("/api/usuarios", get(users::list_users))
        .with_state(state);

    let docs = SwaggerUi::new("/docs").url("/api-docs/openapi.json", ApiDoc::openapi());

    api.merge(docs)
        .layer(cors)
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO).include_headers(false))
                .on_request(DefaultOnRequest::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO).include_headers(false))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        )
}
