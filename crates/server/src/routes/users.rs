use axum::{extract::State, Json};

use service::auth::domain::PublicUser;

use crate::errors::ApiError;
use crate::routes::auth::ServerState;

#[utoipa::path(get, path = "/api/usuarios", tag = "users", responses((status = 200, description = "All users without passwords", body = [crate::openapi::UserResponse])))]
pub async fn list_users(State(state): State<ServerState>) -> Result<Json<Vec<PublicUser>>, ApiError> {
    Ok(Json(state.users.list().await?))
}
