use std::sync::Arc;

use axum::{extract::rejection::JsonRejection, extract::State, http::StatusCode, Json};

use service::auth::{
    domain::{LoginInput, PublicUser, RegisterInput},
    repository::UserRepository,
    UserService,
};

use crate::errors::ApiError;

/// Router state: the user service is the handlers' only collaborator.
#[derive(Clone)]
pub struct ServerState {
    pub users: Arc<UserService>,
}

impl ServerState {
    pub fn new(repo: Arc<dyn UserRepository>) -> Self {
        Self { users: Arc::new(UserService::new(repo)) }
    }
}

/// Responds with a single-element list holding the matched user.
#[utoipa::path(post, path = "/auth/login", tag = "auth", request_body = crate::openapi::LoginRequest, responses((status = 200, description = "Logged in", body = [crate::openapi::UserResponse]), (status = 400, description = "Missing or invalid body", body = crate::openapi::ErrorResponse), (status = 401, description = "Invalid credentials", body = crate::openapi::ErrorResponse)))]
pub async fn login(
    State(state): State<ServerState>,
    payload: Result<Json<LoginInput>, JsonRejection>,
) -> Result<Json<Vec<PublicUser>>, ApiError> {
    let Json(input) = payload?;
    let user = state.users.login(input).await?;
    Ok(Json(vec![user]))
}

#[utoipa::path(post, path = "/auth/registro", tag = "auth", request_body = crate::openapi::RegisterRequest, responses((status = 201, description = "Registered", body = crate::openapi::UserResponse), (status = 400, description = "Missing fields", body = crate::openapi::ErrorResponse), (status = 409, description = "Username or email taken", body = crate::openapi::ErrorResponse)))]
pub async fn register(
    State(state): State<ServerState>,
    payload: Result<Json<RegisterInput>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), ApiError> {
    let Json(input) = payload?;
    let user = state.users.register(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}
