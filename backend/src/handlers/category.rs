//! HTTP handlers for category endpoints

use axum::{extract::State, http::StatusCode, Json};

use crate::error::AppResult;
use crate::services::category::{Category, CategoryService, CreateCategoryInput};
use crate::AppState;

/// List all categories
pub async fn list_categories(State(state): State<AppState>) -> AppResult<Json<Vec<Category>>> {
    let service = CategoryService::new(state.db);
    Ok(Json(service.list_categories().await?))
}

/// Create a category
pub async fn create_category(
    State(state): State<AppState>,
    Json(input): Json<CreateCategoryInput>,
) -> AppResult<(StatusCode, Json<Category>)> {
    let service = CategoryService::new(state.db);
    let category = service.create_category(input).await?;
    Ok((StatusCode::CREATED, Json(category)))
}
