//! Product catalog service
//!
//! Covers the cosmetic side of products. `stock` is set once at creation
//! and afterwards only ever written by the movement engine and inventory
//! completion; the update path here deliberately leaves it untouched so the
//! ledger and the stock level cannot drift apart.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Service managing the product catalog
#[derive(Clone)]
pub struct ProductService {
    db: PgPool,
}

/// A product with its category resolved
#[derive(Debug, Clone, Serialize)]
pub struct Product {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub supplier: Option<String>,
    pub price: Decimal,
    pub stock: i32,
    pub min_stock: i32,
    pub optimal_stock: i32,
    pub category: CategoryRef,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Category reference embedded in product responses
#[derive(Debug, Clone, Serialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// Input for creating a product
#[derive(Debug, Deserialize, Validate)]
pub struct CreateProductInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    pub category_id: Uuid,
    pub supplier: Option<String>,
    pub price: Option<Decimal>,
    pub stock: Option<i32>,
    pub min_stock: Option<i32>,
    pub optimal_stock: Option<i32>,
}

/// Input for updating a product (cosmetic fields only, stock excluded)
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateProductInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    pub category_id: Uuid,
    pub supplier: Option<String>,
    pub price: Option<Decimal>,
    pub min_stock: Option<i32>,
    pub optimal_stock: Option<i32>,
}

#[derive(Debug, FromRow)]
struct ProductRow {
    id: Uuid,
    code: String,
    name: String,
    supplier: Option<String>,
    price: Decimal,
    stock: i32,
    min_stock: i32,
    optimal_stock: i32,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
    category_id: Uuid,
    category_code: String,
    category_name: String,
}

impl From<ProductRow> for Product {
    fn from(row: ProductRow) -> Self {
        Product {
            id: row.id,
            code: row.code,
            name: row.name,
            supplier: row.supplier,
            price: row.price,
            stock: row.stock,
            min_stock: row.min_stock,
            optimal_stock: row.optimal_stock,
            category: CategoryRef {
                id: row.category_id,
                code: row.category_code,
                name: row.category_name,
            },
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

const PRODUCT_SELECT: &str = r#"
    SELECT p.id, p.code, p.name, p.supplier, p.price, p.stock, p.min_stock, p.optimal_stock,
           p.created_at, p.updated_at,
           c.id AS category_id, c.code AS category_code, c.name AS category_name
    FROM products p
    JOIN categories c ON c.id = p.category_id
"#;

impl ProductService {
    /// Create a new ProductService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all products with their categories
    pub async fn list_products(&self) -> AppResult<Vec<Product>> {
        let rows =
            sqlx::query_as::<_, ProductRow>(&format!("{} ORDER BY p.name", PRODUCT_SELECT))
                .fetch_all(&self.db)
                .await?;

        Ok(rows.into_iter().map(Product::from).collect())
    }

    /// Get a product by id
    pub async fn get_product(&self, product_id: Uuid) -> AppResult<Product> {
        let row = sqlx::query_as::<_, ProductRow>(&format!("{} WHERE p.id = $1", PRODUCT_SELECT))
            .bind(product_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Product".to_string()))?;

        Ok(row.into())
    }

    /// Create a product. The initial stock is the only stock write that
    /// does not go through the movement engine.
    pub async fn create_product(&self, input: CreateProductInput) -> AppResult<Product> {
        input.validate()?;
        Self::check_quantities(input.price, input.stock, input.min_stock, input.optimal_stock)?;

        self.check_code_unique(&input.code, None).await?;
        self.check_category_exists(input.category_id).await?;

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO products (name, code, category_id, supplier, price, stock, min_stock, optimal_stock)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.category_id)
        .bind(&input.supplier)
        .bind(input.price.unwrap_or(Decimal::ZERO))
        .bind(input.stock.unwrap_or(0))
        .bind(input.min_stock.unwrap_or(0))
        .bind(input.optimal_stock.unwrap_or(0))
        .fetch_one(&self.db)
        .await?;

        self.get_product(id).await
    }

    /// Update a product's cosmetic fields. `stock` is not updatable here.
    pub async fn update_product(
        &self,
        product_id: Uuid,
        input: UpdateProductInput,
    ) -> AppResult<Product> {
        input.validate()?;
        Self::check_quantities(input.price, None, input.min_stock, input.optimal_stock)?;

        // 404 before any uniqueness complaint
        self.get_product(product_id).await?;
        self.check_code_unique(&input.code, Some(product_id)).await?;
        self.check_category_exists(input.category_id).await?;

        sqlx::query(
            r#"
            UPDATE products
            SET name = $1, code = $2, category_id = $3, supplier = $4,
                price = $5, min_stock = $6, optimal_stock = $7, updated_at = NOW()
            WHERE id = $8
            "#,
        )
        .bind(&input.name)
        .bind(&input.code)
        .bind(input.category_id)
        .bind(&input.supplier)
        .bind(input.price.unwrap_or(Decimal::ZERO))
        .bind(input.min_stock.unwrap_or(0))
        .bind(input.optimal_stock.unwrap_or(0))
        .bind(product_id)
        .execute(&self.db)
        .await?;

        self.get_product(product_id).await
    }

    /// Delete a product and, by cascade, its movements and inventory items
    pub async fn delete_product(&self, product_id: Uuid) -> AppResult<()> {
        let result = sqlx::query("DELETE FROM products WHERE id = $1")
            .bind(product_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("Product".to_string()));
        }

        Ok(())
    }

    fn check_quantities(
        price: Option<Decimal>,
        stock: Option<i32>,
        min_stock: Option<i32>,
        optimal_stock: Option<i32>,
    ) -> AppResult<()> {
        if price.is_some_and(|p| p < Decimal::ZERO) {
            return Err(AppError::Validation {
                field: "price".to_string(),
                message: "Price cannot be negative".to_string(),
            });
        }
        for (field, value) in [
            ("stock", stock),
            ("min_stock", min_stock),
            ("optimal_stock", optimal_stock),
        ] {
            if value.is_some_and(|v| v < 0) {
                return Err(AppError::Validation {
                    field: field.to_string(),
                    message: format!("{} cannot be negative", field),
                });
            }
        }
        Ok(())
    }

    async fn check_code_unique(&self, code: &str, exclude: Option<Uuid>) -> AppResult<()> {
        let taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM products WHERE code = $1 AND ($2::uuid IS NULL OR id <> $2))",
        )
        .bind(code)
        .bind(exclude)
        .fetch_one(&self.db)
        .await?;

        if taken {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }
        Ok(())
    }

    async fn check_category_exists(&self, category_id: Uuid) -> AppResult<()> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
        )
        .bind(category_id)
        .fetch_one(&self.db)
        .await?;

        if !exists {
            return Err(AppError::Validation {
                field: "category_id".to_string(),
                message: "Category does not exist".to_string(),
            });
        }
        Ok(())
    }
}
