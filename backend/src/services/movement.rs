//! Stock mutation engine
//!
//! The only write path for `products.stock`. Creating a movement and
//! reversing one are each a single transaction that locks the product row
//! (`SELECT ... FOR UPDATE`), so the sufficiency check and the stock write
//! cannot interleave with another mutator of the same product. Operations
//! on different products do not contend.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{MovementCategory, MovementDirection, ProductRef, UserRef};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{
    check_exit_sufficiency, stock_after_movement, stock_after_reversal, validate_movement,
};

/// Service applying stock movements to products
#[derive(Clone)]
pub struct MovementService {
    db: PgPool,
}

/// A stock movement with its product and actor resolved
#[derive(Debug, Clone, Serialize)]
pub struct Movement {
    pub id: Uuid,
    pub direction: MovementDirection,
    pub category: MovementCategory,
    pub quantity: i32,
    pub reason: Option<String>,
    pub date: DateTime<Utc>,
    pub product: ProductRef,
    pub user: Option<UserRef>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating a movement
#[derive(Debug, Deserialize)]
pub struct CreateMovementInput {
    pub product_id: Uuid,
    pub direction: MovementDirection,
    pub category: MovementCategory,
    pub quantity: i32,
    pub reason: Option<String>,
    pub date: DateTime<Utc>,
}

/// Filters for listing movements
#[derive(Debug, Default, Deserialize)]
pub struct MovementFilter {
    pub direction: Option<String>,
    pub product_id: Option<Uuid>,
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
}

/// Entry/exit totals over a date range
#[derive(Debug, Clone, Serialize)]
pub struct MovementSummary {
    pub total_entries: i64,
    pub total_exits: i64,
    pub total_movements: i64,
    pub net_movement: i64,
}

/// Row for movement queries with product and user joined
#[derive(Debug, FromRow)]
struct MovementRow {
    id: Uuid,
    direction: String,
    category: String,
    quantity: i32,
    reason: Option<String>,
    date: DateTime<Utc>,
    created_at: DateTime<Utc>,
    product_id: Uuid,
    product_code: String,
    product_name: String,
    user_id: Option<Uuid>,
    user_name: Option<String>,
}

impl TryFrom<MovementRow> for Movement {
    type Error = AppError;

    fn try_from(row: MovementRow) -> Result<Self, Self::Error> {
        let direction = row
            .direction
            .parse::<MovementDirection>()
            .map_err(|_| AppError::Internal(format!("Bad direction in ledger: {}", row.direction)))?;
        let category = row
            .category
            .parse::<MovementCategory>()
            .map_err(|_| AppError::Internal(format!("Bad category in ledger: {}", row.category)))?;

        Ok(Movement {
            id: row.id,
            direction,
            category,
            quantity: row.quantity,
            reason: row.reason,
            date: row.date,
            product: ProductRef {
                id: row.product_id,
                code: row.product_code,
                name: row.product_name,
            },
            user: match (row.user_id, row.user_name) {
                (Some(id), Some(name)) => Some(UserRef { id, name }),
                _ => None,
            },
            created_at: row.created_at,
        })
    }
}

const MOVEMENT_SELECT: &str = r#"
    SELECT m.id, m.direction, m.category, m.quantity, m.reason, m.date, m.created_at,
           p.id AS product_id, p.code AS product_code, p.name AS product_name,
           u.id AS user_id, u.name AS user_name
    FROM movements m
    JOIN products p ON p.id = m.product_id
    LEFT JOIN users u ON u.id = m.user_id
"#;

impl MovementService {
    /// Create a new MovementService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Apply a movement: validate, lock the product row, check sufficiency
    /// for exits, insert the ledger record and update the stock, all in one
    /// transaction.
    pub async fn create_movement(
        &self,
        user_id: Uuid,
        input: CreateMovementInput,
    ) -> AppResult<Movement> {
        validate_movement(input.direction, input.category, input.quantity)
            .map_err(|msg| AppError::ValidationError(msg.to_string()))?;

        let mut tx = self.db.begin().await?;

        // Row lock: the sufficiency check and the stock write must be atomic
        // with respect to other mutators of this product.
        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(input.product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        if input.direction == MovementDirection::Exit {
            check_exit_sufficiency(stock, input.quantity).map_err(|_| {
                AppError::InsufficientStock {
                    available: stock,
                    requested: input.quantity,
                }
            })?;
        }

        let movement_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO movements (product_id, direction, category, quantity, reason, user_id, date)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id
            "#,
        )
        .bind(input.product_id)
        .bind(input.direction.as_str())
        .bind(input.category.as_str())
        .bind(input.quantity)
        .bind(&input.reason)
        .bind(user_id)
        .bind(input.date)
        .fetch_one(&mut *tx)
        .await?;

        let new_stock = stock_after_movement(stock, input.direction, input.quantity);
        sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(input.product_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            product_id = %input.product_id,
            direction = input.direction.as_str(),
            quantity = input.quantity,
            stock = new_stock,
            "movement applied"
        );

        self.get_movement(movement_id).await
    }

    /// Reverse a movement: delete the ledger record and apply the inverse
    /// stock delta. Reversing an entry fails when the stock cannot absorb
    /// the take-back.
    pub async fn delete_movement(&self, movement_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        // Lock the movement row so concurrent reversals of the same movement
        // serialize here; the loser sees the row gone and gets NotFound
        // instead of re-applying the inverse delta.
        let row = sqlx::query_as::<_, (Uuid, String, i32)>(
            "SELECT product_id, direction, quantity FROM movements WHERE id = $1 FOR UPDATE",
        )
        .bind(movement_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        let (product_id, direction, quantity) = row;
        let direction = direction
            .parse::<MovementDirection>()
            .map_err(|_| AppError::Internal(format!("Bad direction in ledger: {}", direction)))?;

        let stock = sqlx::query_scalar::<_, i32>(
            "SELECT stock FROM products WHERE id = $1 FOR UPDATE",
        )
        .bind(product_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let new_stock =
            stock_after_reversal(stock, direction, quantity).map_err(|_| AppError::NegativeStock)?;

        sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
            .bind(new_stock)
            .bind(product_id)
            .execute(&mut *tx)
            .await?;

        let deleted = sqlx::query("DELETE FROM movements WHERE id = $1")
            .bind(movement_id)
            .execute(&mut *tx)
            .await?;

        // The row vanished between the lock and the delete; roll back the
        // stock write rather than reverse a movement that no longer exists.
        if deleted.rows_affected() == 0 {
            return Err(AppError::NotFound("Movement".to_string()));
        }

        tx.commit().await?;

        tracing::info!(
            %product_id,
            %movement_id,
            stock = new_stock,
            "movement reversed"
        );

        Ok(())
    }

    /// Get a movement by id with product and user resolved
    pub async fn get_movement(&self, movement_id: Uuid) -> AppResult<Movement> {
        let row = sqlx::query_as::<_, MovementRow>(&format!("{} WHERE m.id = $1", MOVEMENT_SELECT))
            .bind(movement_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Movement".to_string()))?;

        row.try_into()
    }

    /// List movements, newest first, with optional filters and pagination
    pub async fn list_movements(
        &self,
        filter: MovementFilter,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Movement>> {
        // A direction filter of "all" means no filter
        let direction = filter.direction.filter(|d| d != "all");

        let total = sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*) FROM movements m
            WHERE ($1::text IS NULL OR m.direction = $1)
              AND ($2::uuid IS NULL OR m.product_id = $2)
              AND ($3::timestamptz IS NULL OR m.date >= $3)
              AND ($4::timestamptz IS NULL OR m.date <= $4)
            "#,
        )
        .bind(&direction)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR m.direction = $1)
              AND ($2::uuid IS NULL OR m.product_id = $2)
              AND ($3::timestamptz IS NULL OR m.date >= $3)
              AND ($4::timestamptz IS NULL OR m.date <= $4)
            ORDER BY m.date DESC
            LIMIT $5 OFFSET $6
            "#,
            MOVEMENT_SELECT
        ))
        .bind(&direction)
        .bind(filter.product_id)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(Movement::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total),
        })
    }

    /// Get all movements for a product, newest first
    pub async fn movements_by_product(&self, product_id: Uuid) -> AppResult<Vec<Movement>> {
        let product_exists =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM products WHERE id = $1)")
                .bind(product_id)
                .fetch_one(&self.db)
                .await?;

        if !product_exists {
            return Err(AppError::NotFound("Product".to_string()));
        }

        let rows = sqlx::query_as::<_, MovementRow>(&format!(
            "{} WHERE m.product_id = $1 ORDER BY m.date DESC",
            MOVEMENT_SELECT
        ))
        .bind(product_id)
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(Movement::try_from).collect()
    }

    /// Entry/exit totals, optionally restricted to a date range
    pub async fn summary(
        &self,
        start_date: Option<DateTime<Utc>>,
        end_date: Option<DateTime<Utc>>,
    ) -> AppResult<MovementSummary> {
        let row = sqlx::query_as::<_, (i64, i64, i64)>(
            r#"
            SELECT COALESCE(SUM(CASE WHEN direction = 'entree' THEN quantity ELSE 0 END), 0)::bigint,
                   COALESCE(SUM(CASE WHEN direction = 'sortie' THEN quantity ELSE 0 END), 0)::bigint,
                   COUNT(*)
            FROM movements
            WHERE ($1::timestamptz IS NULL OR date >= $1)
              AND ($2::timestamptz IS NULL OR date <= $2)
            "#,
        )
        .bind(start_date)
        .bind(end_date)
        .fetch_one(&self.db)
        .await?;

        Ok(MovementSummary {
            total_entries: row.0,
            total_exits: row.1,
            total_movements: row.2,
            net_movement: row.0 - row.1,
        })
    }
}
