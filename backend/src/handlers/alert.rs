//! HTTP handlers for stock alerts

use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::error::{AppError, AppResult};
use crate::models::AlertType;
use crate::services::alert::{Alert, AlertService};
use crate::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct AlertQuery {
    /// Alert type filter; "all" disables it
    #[serde(rename = "type")]
    pub alert_type: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct AlertsResponse {
    pub data: Vec<Alert>,
}

/// List current stock alerts, sorted by severity
pub async fn list_alerts(
    State(state): State<AppState>,
    Query(query): Query<AlertQuery>,
) -> AppResult<Json<AlertsResponse>> {
    let filter = match query.alert_type.as_deref() {
        None | Some("all") => None,
        Some(raw) => Some(raw.parse::<AlertType>().map_err(|_| {
            AppError::Validation {
                field: "type".to_string(),
                message: format!("Unknown alert type: {}", raw),
            }
        })?),
    };

    let service = AlertService::new(state.db);
    let data = service.list_alerts(filter).await?;
    Ok(Json(AlertsResponse { data }))
}
