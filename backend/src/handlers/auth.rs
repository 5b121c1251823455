//! Authentication handlers

use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::auth::{LoginResponse, RegisterInput, RegistrationStatus, UserProfile};
use crate::services::AuthService;
use crate::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Register the first account (becomes admin)
pub async fn register(
    State(state): State<AppState>,
    Json(input): Json<RegisterInput>,
) -> AppResult<(StatusCode, Json<UserProfile>)> {
    let service = AuthService::new(state.db.clone(), &state.config);
    let profile = service.register(input).await?;
    Ok((StatusCode::CREATED, Json(profile)))
}

/// Whether registration is currently open
pub async fn can_register(State(state): State<AppState>) -> AppResult<Json<RegistrationStatus>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(service.registration_status().await?))
}

/// Login endpoint handler
pub async fn login(
    State(state): State<AppState>,
    Json(body): Json<LoginRequest>,
) -> AppResult<Json<LoginResponse>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(service.login(&body.email, &body.password).await?))
}

/// Profile of the authenticated user
pub async fn me(
    State(state): State<AppState>,
    current_user: CurrentUser,
) -> AppResult<Json<UserProfile>> {
    let service = AuthService::new(state.db.clone(), &state.config);
    Ok(Json(service.me(current_user.0.user_id).await?))
}
