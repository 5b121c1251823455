//! HTTP handlers for stock movement endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::movement::{
    CreateMovementInput, Movement, MovementFilter, MovementService, MovementSummary,
};
use crate::AppState;
use shared::types::{PaginatedResponse, Pagination};

/// Query parameters for listing movements
#[derive(Debug, Default, Deserialize)]
pub struct MovementListQuery {
    /// Direction filter; "all" disables it
    #[serde(rename = "type")]
    pub direction: Option<String>,
    pub product_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

#[derive(Debug, Default, Deserialize)]
pub struct SummaryQuery {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

fn pagination_from(page: Option<u32>, per_page: Option<u32>) -> Pagination {
    let defaults = Pagination::default();
    Pagination {
        page: page.unwrap_or(defaults.page),
        per_page: per_page.unwrap_or(defaults.per_page),
    }
}

/// List movements with filters and pagination
pub async fn list_movements(
    State(state): State<AppState>,
    Query(query): Query<MovementListQuery>,
) -> AppResult<Json<PaginatedResponse<Movement>>> {
    let service = MovementService::new(state.db);
    let result = service
        .list_movements(
            MovementFilter {
                direction: query.direction,
                product_id: query.product_id,
                start_date: query.start_date,
                end_date: query.end_date,
            },
            pagination_from(query.page, query.per_page),
        )
        .await?;
    Ok(Json(result))
}

/// Get movements for a specific product
pub async fn movements_by_product(
    State(state): State<AppState>,
    Path(product_id): Path<Uuid>,
) -> AppResult<Json<Vec<Movement>>> {
    let service = MovementService::new(state.db);
    Ok(Json(service.movements_by_product(product_id).await?))
}

/// Get a specific movement
pub async fn get_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<Movement>> {
    let service = MovementService::new(state.db);
    Ok(Json(service.get_movement(movement_id).await?))
}

/// Create a movement (applies its stock effect)
pub async fn create_movement(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateMovementInput>,
) -> AppResult<(StatusCode, Json<Movement>)> {
    let service = MovementService::new(state.db);
    let movement = service
        .create_movement(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(movement)))
}

/// Delete a movement (reverses its stock effect)
pub async fn delete_movement(
    State(state): State<AppState>,
    Path(movement_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = MovementService::new(state.db);
    service.delete_movement(movement_id).await?;
    Ok(Json(()))
}

/// Entry/exit totals over an optional date range
pub async fn movement_summary(
    State(state): State<AppState>,
    Query(query): Query<SummaryQuery>,
) -> AppResult<Json<MovementSummary>> {
    let service = MovementService::new(state.db);
    Ok(Json(
        service.summary(query.start_date, query.end_date).await?,
    ))
}
