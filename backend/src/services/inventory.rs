//! Inventory reconciliation
//!
//! Manages draft physical counts and their completion. Completion is the
//! second write path to `products.stock`: an authoritative overwrite of each
//! counted product, with a compensating correction movement recorded for
//! every non-zero difference. The whole completion commits as one
//! transaction or not at all.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::models::{InventoryStatus, ProductRef, UserRef};
use shared::types::{PaginatedResponse, Pagination, PaginationMeta};
use shared::validation::{compute_difference, correction_for_difference, validate_actual_quantity};

/// Service managing inventory count sessions
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// An inventory count session
#[derive(Debug, Clone, Serialize)]
pub struct Inventory {
    pub id: Uuid,
    pub date: DateTime<Utc>,
    pub status: InventoryStatus,
    pub notes: Option<String>,
    pub user: Option<UserRef>,
    /// Sum of the signed differences of all items
    pub total_difference: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub items: Option<Vec<InventoryItem>>,
    pub created_at: DateTime<Utc>,
}

/// A counted product within an inventory
#[derive(Debug, Clone, Serialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub inventory_id: Uuid,
    pub product: ProductRef,
    /// Snapshot of the product stock when the item was added
    pub expected_quantity: i32,
    pub actual_quantity: i32,
    /// actual_quantity - expected_quantity
    pub difference: i32,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an inventory
#[derive(Debug, Deserialize)]
pub struct CreateInventoryInput {
    pub date: DateTime<Utc>,
    pub notes: Option<String>,
}

/// Input for adding an item to an inventory
#[derive(Debug, Deserialize)]
pub struct AddItemInput {
    pub product_id: Uuid,
    pub actual_quantity: i32,
    pub notes: Option<String>,
}

/// Input for updating an inventory item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub actual_quantity: i32,
    pub notes: Option<String>,
}

#[derive(Debug, FromRow)]
struct InventoryRow {
    id: Uuid,
    date: DateTime<Utc>,
    status: String,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    user_id: Option<Uuid>,
    user_name: Option<String>,
    total_difference: i64,
}

#[derive(Debug, FromRow)]
struct ItemRow {
    id: Uuid,
    inventory_id: Uuid,
    expected_quantity: i32,
    actual_quantity: i32,
    difference: i32,
    notes: Option<String>,
    created_at: DateTime<Utc>,
    product_id: Uuid,
    product_code: String,
    product_name: String,
}

impl TryFrom<InventoryRow> for Inventory {
    type Error = AppError;

    fn try_from(row: InventoryRow) -> Result<Self, Self::Error> {
        let status = row
            .status
            .parse::<InventoryStatus>()
            .map_err(|_| AppError::Internal(format!("Bad inventory status: {}", row.status)))?;

        Ok(Inventory {
            id: row.id,
            date: row.date,
            status,
            notes: row.notes,
            user: match (row.user_id, row.user_name) {
                (Some(id), Some(name)) => Some(UserRef { id, name }),
                _ => None,
            },
            total_difference: row.total_difference,
            items: None,
            created_at: row.created_at,
        })
    }
}

impl From<ItemRow> for InventoryItem {
    fn from(row: ItemRow) -> Self {
        InventoryItem {
            id: row.id,
            inventory_id: row.inventory_id,
            product: ProductRef {
                id: row.product_id,
                code: row.product_code,
                name: row.product_name,
            },
            expected_quantity: row.expected_quantity,
            actual_quantity: row.actual_quantity,
            difference: row.difference,
            notes: row.notes,
            created_at: row.created_at,
        }
    }
}

const INVENTORY_SELECT: &str = r#"
    SELECT i.id, i.date, i.status, i.notes, i.created_at,
           u.id AS user_id, u.name AS user_name,
           COALESCE((SELECT SUM(difference) FROM inventory_items WHERE inventory_id = i.id), 0)::bigint
               AS total_difference
    FROM inventories i
    LEFT JOIN users u ON u.id = i.user_id
"#;

const ITEM_SELECT: &str = r#"
    SELECT it.id, it.inventory_id, it.expected_quantity, it.actual_quantity, it.difference,
           it.notes, it.created_at,
           p.id AS product_id, p.code AS product_code, p.name AS product_name
    FROM inventory_items it
    JOIN products p ON p.id = it.product_id
"#;

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create a new inventory in draft status
    pub async fn create_inventory(
        &self,
        user_id: Uuid,
        input: CreateInventoryInput,
    ) -> AppResult<Inventory> {
        let inventory_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventories (date, user_id, status, notes)
            VALUES ($1, $2, 'draft', $3)
            RETURNING id
            "#,
        )
        .bind(input.date)
        .bind(user_id)
        .bind(&input.notes)
        .fetch_one(&self.db)
        .await?;

        self.get_inventory(inventory_id).await
    }

    /// List inventories, newest first, with optional status filter
    pub async fn list_inventories(
        &self,
        status: Option<String>,
        pagination: Pagination,
    ) -> AppResult<PaginatedResponse<Inventory>> {
        let status = status.filter(|s| s != "all");

        let total = sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM inventories WHERE ($1::text IS NULL OR status = $1)",
        )
        .bind(&status)
        .fetch_one(&self.db)
        .await?;

        let rows = sqlx::query_as::<_, InventoryRow>(&format!(
            r#"{}
            WHERE ($1::text IS NULL OR i.status = $1)
            ORDER BY i.date DESC
            LIMIT $2 OFFSET $3
            "#,
            INVENTORY_SELECT
        ))
        .bind(&status)
        .bind(pagination.limit())
        .bind(pagination.offset())
        .fetch_all(&self.db)
        .await?;

        let data = rows
            .into_iter()
            .map(Inventory::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(PaginatedResponse {
            data,
            pagination: PaginationMeta::new(&pagination, total),
        })
    }

    /// Get an inventory with all its items
    pub async fn get_inventory(&self, inventory_id: Uuid) -> AppResult<Inventory> {
        let row =
            sqlx::query_as::<_, InventoryRow>(&format!("{} WHERE i.id = $1", INVENTORY_SELECT))
                .bind(inventory_id)
                .fetch_optional(&self.db)
                .await?
                .ok_or_else(|| AppError::NotFound("Inventory".to_string()))?;

        let mut inventory = Inventory::try_from(row)?;

        let items = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE it.inventory_id = $1 ORDER BY it.created_at",
            ITEM_SELECT
        ))
        .bind(inventory_id)
        .fetch_all(&self.db)
        .await?;

        inventory.items = Some(items.into_iter().map(InventoryItem::from).collect());
        Ok(inventory)
    }

    /// Add a product count to a draft inventory
    ///
    /// Snapshots `expected_quantity` from the product's current stock; the
    /// snapshot is never re-derived afterwards.
    pub async fn add_item(
        &self,
        inventory_id: Uuid,
        input: AddItemInput,
    ) -> AppResult<InventoryItem> {
        validate_actual_quantity(input.actual_quantity).map_err(|msg| AppError::Validation {
            field: "actual_quantity".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let status = self.lock_inventory_status(&mut tx, inventory_id).await?;
        if !status.is_draft() {
            return Err(AppError::InventoryNotDraft);
        }

        let already_counted = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM inventory_items WHERE inventory_id = $1 AND product_id = $2)",
        )
        .bind(inventory_id)
        .bind(input.product_id)
        .fetch_one(&mut *tx)
        .await?;

        if already_counted {
            return Err(AppError::DuplicateItem);
        }

        let expected_quantity =
            sqlx::query_scalar::<_, i32>("SELECT stock FROM products WHERE id = $1")
                .bind(input.product_id)
                .fetch_optional(&mut *tx)
                .await?
                .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        let difference = compute_difference(input.actual_quantity, expected_quantity);

        let item_id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO inventory_items
                (inventory_id, product_id, expected_quantity, actual_quantity, difference, notes)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id
            "#,
        )
        .bind(inventory_id)
        .bind(input.product_id)
        .bind(expected_quantity)
        .bind(input.actual_quantity)
        .bind(difference)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_item(inventory_id, item_id).await
    }

    /// Update the counted quantity of an item in a draft inventory
    ///
    /// The difference is recomputed against the item's original snapshot.
    pub async fn update_item(
        &self,
        inventory_id: Uuid,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItem> {
        validate_actual_quantity(input.actual_quantity).map_err(|msg| AppError::Validation {
            field: "actual_quantity".to_string(),
            message: msg.to_string(),
        })?;

        let mut tx = self.db.begin().await?;

        let status = self.lock_inventory_status(&mut tx, inventory_id).await?;
        if !status.is_draft() {
            return Err(AppError::InventoryNotDraft);
        }

        let expected_quantity = sqlx::query_scalar::<_, i32>(
            "SELECT expected_quantity FROM inventory_items WHERE id = $1 AND inventory_id = $2",
        )
        .bind(item_id)
        .bind(inventory_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        let difference = compute_difference(input.actual_quantity, expected_quantity);

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET actual_quantity = $1, difference = $2, notes = COALESCE($3, notes),
                updated_at = NOW()
            WHERE id = $4
            "#,
        )
        .bind(input.actual_quantity)
        .bind(difference)
        .bind(&input.notes)
        .bind(item_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        self.get_item(inventory_id, item_id).await
    }

    /// Remove an item from a draft inventory
    pub async fn remove_item(&self, inventory_id: Uuid, item_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let status = self.lock_inventory_status(&mut tx, inventory_id).await?;
        if !status.is_draft() {
            return Err(AppError::InventoryNotDraft);
        }

        let result = sqlx::query("DELETE FROM inventory_items WHERE id = $1 AND inventory_id = $2")
            .bind(item_id)
            .bind(inventory_id)
            .execute(&mut *tx)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Inventory item".to_string()));
        }

        tx.commit().await?;
        Ok(())
    }

    /// Complete an inventory: overwrite each counted product's stock with
    /// the counted quantity, record one correction movement per non-zero
    /// difference, and flip the status. One transaction, all or nothing.
    pub async fn complete_inventory(
        &self,
        user_id: Uuid,
        inventory_id: Uuid,
    ) -> AppResult<Inventory> {
        let mut tx = self.db.begin().await?;

        let (status, date) = sqlx::query_as::<_, (String, DateTime<Utc>)>(
            "SELECT status, date FROM inventories WHERE id = $1 FOR UPDATE",
        )
        .bind(inventory_id)
        .fetch_optional(&mut *tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory".to_string()))?;

        let status = status
            .parse::<InventoryStatus>()
            .map_err(|_| AppError::Internal(format!("Bad inventory status: {}", status)))?;
        if !status.is_draft() {
            return Err(AppError::AlreadyCompleted);
        }

        let items = sqlx::query_as::<_, (Uuid, i32, i32)>(
            r#"
            SELECT product_id, actual_quantity, difference
            FROM inventory_items
            WHERE inventory_id = $1
            ORDER BY created_at
            "#,
        )
        .bind(inventory_id)
        .fetch_all(&mut *tx)
        .await?;

        for (product_id, actual_quantity, difference) in &items {
            // Authoritative overwrite, not a delta-apply. The UPDATE takes
            // the row lock, serializing against the movement engine.
            let updated =
                sqlx::query("UPDATE products SET stock = $1, updated_at = NOW() WHERE id = $2")
                    .bind(actual_quantity)
                    .bind(product_id)
                    .execute(&mut *tx)
                    .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::NotFound("Product".to_string()));
            }

            // The ledger still gets a correction for audit; inserted
            // directly because 'correction' is not part of the exit
            // vocabulary exposed to the movement API.
            if let Some((direction, quantity)) = correction_for_difference(*difference) {
                sqlx::query(
                    r#"
                    INSERT INTO movements (product_id, direction, category, quantity, reason, user_id, date)
                    VALUES ($1, $2, 'correction', $3, $4, $5, $6)
                    "#,
                )
                .bind(product_id)
                .bind(direction.as_str())
                .bind(quantity)
                .bind(format!("Inventory adjustment #{}", inventory_id))
                .bind(user_id)
                .bind(date)
                .execute(&mut *tx)
                .await?;
            }
        }

        sqlx::query("UPDATE inventories SET status = 'completed', updated_at = NOW() WHERE id = $1")
            .bind(inventory_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;

        tracing::info!(
            %inventory_id,
            items = items.len(),
            "inventory completed"
        );

        self.get_inventory(inventory_id).await
    }

    /// Delete a draft inventory and its items
    ///
    /// The status check and the delete share a transaction holding the row
    /// lock, so a concurrent completion cannot slip in between them.
    pub async fn delete_inventory(&self, inventory_id: Uuid) -> AppResult<()> {
        let mut tx = self.db.begin().await?;

        let status = self.lock_inventory_status(&mut tx, inventory_id).await?;
        if status == InventoryStatus::Completed {
            return Err(AppError::InventoryCompleted);
        }

        // Items go with it (ON DELETE CASCADE)
        sqlx::query("DELETE FROM inventories WHERE id = $1")
            .bind(inventory_id)
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(())
    }

    /// Get a single item with its product resolved
    async fn get_item(&self, inventory_id: Uuid, item_id: Uuid) -> AppResult<InventoryItem> {
        let row = sqlx::query_as::<_, ItemRow>(&format!(
            "{} WHERE it.id = $1 AND it.inventory_id = $2",
            ITEM_SELECT
        ))
        .bind(item_id)
        .bind(inventory_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))?;

        Ok(row.into())
    }

    /// Lock the inventory row and return its parsed status. Item mutations
    /// take this lock so a draft check cannot race with completion.
    async fn lock_inventory_status(
        &self,
        tx: &mut sqlx::Transaction<'_, sqlx::Postgres>,
        inventory_id: Uuid,
    ) -> AppResult<InventoryStatus> {
        let status = sqlx::query_scalar::<_, String>(
            "SELECT status FROM inventories WHERE id = $1 FOR UPDATE",
        )
        .bind(inventory_id)
        .fetch_optional(&mut **tx)
        .await?
        .ok_or_else(|| AppError::NotFound("Inventory".to_string()))?;

        status
            .parse::<InventoryStatus>()
            .map_err(|_| AppError::Internal(format!("Bad inventory status: {}", status)))
    }
}
