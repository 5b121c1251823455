//! Dashboard statistics
//!
//! Read-only rollups over products, movements and inventories. No
//! invariants beyond correct aggregation arithmetic.

use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::movement::{Movement, MovementFilter, MovementService};
use shared::types::{Pagination, Period};

/// Number of recent movements shown on the dashboard
const RECENT_MOVEMENTS: u32 = 10;

/// Service computing dashboard statistics
#[derive(Clone)]
pub struct DashboardService {
    db: PgPool,
}

/// Full dashboard payload
#[derive(Debug, Serialize)]
pub struct DashboardStats {
    pub summary: SummaryStats,
    pub movements: MovementStats,
    pub products: ProductStats,
    pub charts: ChartData,
    pub inventories: InventoryStats,
}

#[derive(Debug, Serialize)]
pub struct SummaryStats {
    pub total_products: i64,
    pub total_categories: i64,
    pub total_users: i64,
    pub low_stock_products: i64,
    pub out_of_stock_products: i64,
    /// Σ stock × price over all products
    pub total_stock_value: Decimal,
}

#[derive(Debug, Serialize)]
pub struct MovementStats {
    pub period: Period,
    pub total: i64,
    pub entries: i64,
    pub exits: i64,
    pub recent: Vec<Movement>,
}

#[derive(Debug, Serialize)]
pub struct ProductStats {
    pub top_by_movements: Vec<TopProduct>,
    pub by_category: Vec<CategoryCount>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct TopProduct {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub stock: i32,
    pub movement_count: i64,
}

#[derive(Debug, Serialize, FromRow)]
pub struct CategoryCount {
    pub id: Uuid,
    pub name: String,
    pub count: i64,
}

#[derive(Debug, Serialize)]
pub struct ChartData {
    pub movements_over_time: Vec<DailyMovements>,
}

/// Entry/exit sums for one day
#[derive(Debug, Serialize, FromRow)]
pub struct DailyMovements {
    pub date: NaiveDate,
    pub entries: i64,
    pub exits: i64,
}

#[derive(Debug, Serialize)]
pub struct InventoryStats {
    pub recent: Vec<RecentInventory>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct RecentInventory {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: String,
    pub user: Option<String>,
    pub total_difference: i64,
}

impl DashboardService {
    /// Create a new DashboardService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Compute the dashboard statistics for the given period
    pub async fn stats(&self, period: Period) -> AppResult<DashboardStats> {
        let period_start = period.start_from(Utc::now());

        let (total_products, total_categories, total_users) =
            sqlx::query_as::<_, (i64, i64, i64)>(
                r#"
                SELECT (SELECT COUNT(*) FROM products),
                       (SELECT COUNT(*) FROM categories),
                       (SELECT COUNT(*) FROM users)
                "#,
            )
            .fetch_one(&self.db)
            .await?;

        let (low_stock_products, out_of_stock_products) = sqlx::query_as::<_, (i64, i64)>(
            r#"
            SELECT COUNT(*) FILTER (WHERE stock < min_stock),
                   COUNT(*) FILTER (WHERE stock = 0)
            FROM products
            "#,
        )
        .fetch_one(&self.db)
        .await?;

        let total_stock_value = sqlx::query_scalar::<_, Decimal>(
            "SELECT COALESCE(SUM(stock * price), 0) FROM products",
        )
        .fetch_one(&self.db)
        .await?;

        let movement_service = MovementService::new(self.db.clone());
        let summary = movement_service.summary(Some(period_start), None).await?;
        let recent = movement_service
            .list_movements(
                MovementFilter::default(),
                Pagination {
                    page: 1,
                    per_page: RECENT_MOVEMENTS,
                },
            )
            .await?
            .data;

        let top_by_movements = sqlx::query_as::<_, TopProduct>(
            r#"
            SELECT p.id, p.code, p.name, p.stock, COUNT(m.id) AS movement_count
            FROM products p
            LEFT JOIN movements m ON m.product_id = p.id
            GROUP BY p.id, p.code, p.name, p.stock
            ORDER BY movement_count DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let by_category = sqlx::query_as::<_, CategoryCount>(
            r#"
            SELECT c.id, c.name, COUNT(p.id) AS count
            FROM categories c
            LEFT JOIN products p ON p.category_id = c.id
            GROUP BY c.id, c.name
            ORDER BY count DESC
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        let thirty_days_ago = Utc::now() - Duration::days(30);
        let movements_over_time = sqlx::query_as::<_, DailyMovements>(
            r#"
            SELECT date::date AS date,
                   COALESCE(SUM(quantity) FILTER (WHERE direction = 'entree'), 0)::bigint AS entries,
                   COALESCE(SUM(quantity) FILTER (WHERE direction = 'sortie'), 0)::bigint AS exits
            FROM movements
            WHERE date >= $1
            GROUP BY date::date
            ORDER BY date::date
            "#,
        )
        .bind(thirty_days_ago)
        .fetch_all(&self.db)
        .await?;

        let recent_inventories = sqlx::query_as::<_, RecentInventory>(
            r#"
            SELECT i.id, i.date, i.status, u.name AS user,
                   COALESCE((SELECT SUM(difference) FROM inventory_items WHERE inventory_id = i.id), 0)::bigint
                       AS total_difference
            FROM inventories i
            LEFT JOIN users u ON u.id = i.user_id
            ORDER BY i.date DESC
            LIMIT 5
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(DashboardStats {
            summary: SummaryStats {
                total_products,
                total_categories,
                total_users,
                low_stock_products,
                out_of_stock_products,
                total_stock_value,
            },
            movements: MovementStats {
                period,
                total: summary.total_movements,
                entries: summary.total_entries,
                exits: summary.total_exits,
                recent,
            },
            products: ProductStats {
                top_by_movements,
                by_category,
            },
            charts: ChartData {
                movements_over_time,
            },
            inventories: InventoryStats {
                recent: recent_inventories,
            },
        })
    }
}
