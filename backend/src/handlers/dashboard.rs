//! HTTP handlers for dashboard statistics

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;

use crate::error::AppResult;
use crate::services::dashboard::{DashboardService, DashboardStats};
use crate::AppState;
use shared::types::Period;

#[derive(Debug, Default, Deserialize)]
pub struct StatsQuery {
    pub period: Option<Period>,
}

/// Dashboard statistics for the requested period (default: month)
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Query(query): Query<StatsQuery>,
) -> AppResult<Json<DashboardStats>> {
    let service = DashboardService::new(state.db);
    Ok(Json(service.stats(query.period.unwrap_or_default()).await?))
}
