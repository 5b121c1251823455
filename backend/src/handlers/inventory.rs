//! HTTP handlers for inventory count endpoints

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::middleware::CurrentUser;
use crate::services::inventory::{
    AddItemInput, CreateInventoryInput, Inventory, InventoryItem, InventoryService, UpdateItemInput,
};
use crate::AppState;
use shared::types::{PaginatedResponse, Pagination};

/// Query parameters for listing inventories
#[derive(Debug, Default, Deserialize)]
pub struct InventoryListQuery {
    /// Status filter; "all" disables it
    pub status: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// List inventories with optional status filter
pub async fn list_inventories(
    State(state): State<AppState>,
    Query(query): Query<InventoryListQuery>,
) -> AppResult<Json<PaginatedResponse<Inventory>>> {
    let defaults = Pagination::default();
    let service = InventoryService::new(state.db);
    let result = service
        .list_inventories(
            query.status,
            Pagination {
                page: query.page.unwrap_or(defaults.page),
                per_page: query.per_page.unwrap_or(defaults.per_page),
            },
        )
        .await?;
    Ok(Json(result))
}

/// Create a new inventory in draft status
pub async fn create_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Json(input): Json<CreateInventoryInput>,
) -> AppResult<(StatusCode, Json<Inventory>)> {
    let service = InventoryService::new(state.db);
    let inventory = service
        .create_inventory(current_user.0.user_id, input)
        .await?;
    Ok((StatusCode::CREATED, Json(inventory)))
}

/// Get an inventory with all its items
pub async fn get_inventory(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
) -> AppResult<Json<Inventory>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.get_inventory(inventory_id).await?))
}

/// Add a product count to a draft inventory
pub async fn add_inventory_item(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
    Json(input): Json<AddItemInput>,
) -> AppResult<(StatusCode, Json<InventoryItem>)> {
    let service = InventoryService::new(state.db);
    let item = service.add_item(inventory_id, input).await?;
    Ok((StatusCode::CREATED, Json(item)))
}

/// Update a counted quantity in a draft inventory
pub async fn update_inventory_item(
    State(state): State<AppState>,
    Path((inventory_id, item_id)): Path<(Uuid, Uuid)>,
    Json(input): Json<UpdateItemInput>,
) -> AppResult<Json<InventoryItem>> {
    let service = InventoryService::new(state.db);
    Ok(Json(service.update_item(inventory_id, item_id, input).await?))
}

/// Remove an item from a draft inventory
pub async fn remove_inventory_item(
    State(state): State<AppState>,
    Path((inventory_id, item_id)): Path<(Uuid, Uuid)>,
) -> AppResult<Json<()>> {
    let service = InventoryService::new(state.db);
    service.remove_item(inventory_id, item_id).await?;
    Ok(Json(()))
}

/// Complete an inventory (adjusts stock and records corrections)
pub async fn complete_inventory(
    State(state): State<AppState>,
    current_user: CurrentUser,
    Path(inventory_id): Path<Uuid>,
) -> AppResult<Json<Inventory>> {
    let service = InventoryService::new(state.db);
    Ok(Json(
        service
            .complete_inventory(current_user.0.user_id, inventory_id)
            .await?,
    ))
}

/// Delete a draft inventory
pub async fn delete_inventory(
    State(state): State<AppState>,
    Path(inventory_id): Path<Uuid>,
) -> AppResult<Json<()>> {
    let service = InventoryService::new(state.db);
    service.delete_inventory(inventory_id).await?;
    Ok(Json(()))
}
