//! HTTP handlers for user administration (admin-only routes)

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::user::{CreateUserInput, UpdateUserInput, UserAccount, UserService};
use crate::AppState;

/// List all users
pub async fn list_users(State(state): State<AppState>) -> AppResult<Json<Vec<UserAccount>>> {
    let service = UserService::new(state.db);
    Ok(Json(service.list_users().await?))
}

/// Get a user by id
pub async fn get_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<UserAccount>> {
    let service = UserService::new(state.db);
    Ok(Json(service.get_user(user_id).await?))
}

/// Create a user
pub async fn create_user(
    State(state): State<AppState>,
    Json(input): Json<CreateUserInput>,
) -> AppResult<(StatusCode, Json<UserAccount>)> {
    let service = UserService::new(state.db);
    let user = service.create_user(input).await?;
    Ok((StatusCode::CREATED, Json(user)))
}

/// Partially update a user
pub async fn update_user(
    State(state): State<AppState>,
    Path(user_id): Path<Uuid>,
    Json(input): Json<UpdateUserInput>,
) -> AppResult<Json<UserAccount>> {
    let service = UserService::new(state.db);
    Ok(Json(service.update_user(user_id, input).await?))
}

/// Delete a user (not your own account)
pub async fn delete_user(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(user_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = UserService::new(state.db);
    service.delete_user(current_user.0.user_id, user_id).await?;
    Ok(Json(()))
}
