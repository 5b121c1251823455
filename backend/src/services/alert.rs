//! Stock alert evaluation
//!
//! Read-only: derives rupture/seuil/surstock signals from the current
//! product state. The classification rule itself lives in the shared crate.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::models::AlertType;
use shared::types::Severity;
use shared::validation::classify_stock;

/// Service deriving stock alerts from product state
#[derive(Clone)]
pub struct AlertService {
    db: PgPool,
}

/// A stock alert for a single product
#[derive(Debug, Clone, Serialize)]
pub struct Alert {
    /// Stable synthetic id, e.g. "rupture-<product_id>"
    pub id: String,
    #[serde(rename = "type")]
    pub alert_type: AlertType,
    pub product_id: Uuid,
    /// Display label: "name - code"
    pub product: String,
    pub message: String,
    pub severity: Severity,
    pub stock: i32,
    pub min_stock: i32,
    pub optimal_stock: i32,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, FromRow)]
struct ProductStockRow {
    id: Uuid,
    code: String,
    name: String,
    stock: i32,
    min_stock: i32,
    optimal_stock: i32,
    updated_at: DateTime<Utc>,
}

impl AlertService {
    /// Create a new AlertService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Evaluate alerts over the whole product set, optionally filtered by
    /// type, sorted by severity (critical first, stable otherwise).
    pub async fn list_alerts(&self, alert_type: Option<AlertType>) -> AppResult<Vec<Alert>> {
        let rows = sqlx::query_as::<_, ProductStockRow>(
            r#"
            SELECT id, code, name, stock, min_stock, optimal_stock, updated_at
            FROM products
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let mut alerts: Vec<Alert> = rows
            .iter()
            .flat_map(|product| {
                classify_stock(product.stock, product.min_stock, product.optimal_stock)
                    .into_iter()
                    .map(|kind| Self::build_alert(product, kind))
                    .collect::<Vec<_>>()
            })
            .collect();

        if let Some(wanted) = alert_type {
            alerts.retain(|a| a.alert_type == wanted);
        }

        // Stable: products keep their relative order within a severity
        alerts.sort_by_key(|a| a.severity.rank());

        Ok(alerts)
    }

    fn build_alert(product: &ProductStockRow, kind: AlertType) -> Alert {
        let message = match kind {
            AlertType::Rupture => "Product is out of stock.".to_string(),
            AlertType::Seuil => format!(
                "Minimum stock level reached ({} unit(s) remaining).",
                product.stock
            ),
            AlertType::Surstock => format!(
                "Stock level above optimal ({} > {}).",
                product.stock, product.optimal_stock
            ),
        };

        Alert {
            id: format!("{}-{}", kind.as_str(), product.id),
            alert_type: kind,
            product_id: product.id,
            product: format!("{} - {}", product.name, product.code),
            message,
            severity: kind.severity(),
            stock: product.stock,
            min_stock: product.min_stock,
            optimal_stock: product.optimal_stock,
            created_at: product.updated_at,
        }
    }
}
