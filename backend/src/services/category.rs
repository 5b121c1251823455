//! Product category service

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};

/// Service managing product categories
#[derive(Clone)]
pub struct CategoryService {
    db: PgPool,
}

/// A product category
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct Category {
    pub id: Uuid,
    pub code: String,
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a category
#[derive(Debug, Deserialize, Validate)]
pub struct CreateCategoryInput {
    #[validate(length(min = 1, message = "Code is required"))]
    pub code: String,
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    pub parent_id: Option<Uuid>,
    pub description: Option<String>,
}

impl CategoryService {
    /// Create a new CategoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all categories
    pub async fn list_categories(&self) -> AppResult<Vec<Category>> {
        let categories = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, code, name, parent_id, description, created_at, updated_at
            FROM categories
            ORDER BY name
            "#,
        )
        .fetch_all(&self.db)
        .await?;

        Ok(categories)
    }

    /// Create a category with a unique code
    pub async fn create_category(&self, input: CreateCategoryInput) -> AppResult<Category> {
        input.validate()?;

        let code_taken = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM categories WHERE code = $1)",
        )
        .bind(&input.code)
        .fetch_one(&self.db)
        .await?;
        if code_taken {
            return Err(AppError::DuplicateEntry("code".to_string()));
        }

        if let Some(parent_id) = input.parent_id {
            let parent_exists = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS(SELECT 1 FROM categories WHERE id = $1)",
            )
            .bind(parent_id)
            .fetch_one(&self.db)
            .await?;
            if !parent_exists {
                return Err(AppError::Validation {
                    field: "parent_id".to_string(),
                    message: "Parent category does not exist".to_string(),
                });
            }
        }

        let category = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (code, name, parent_id, description)
            VALUES ($1, $2, $3, $4)
            RETURNING id, code, name, parent_id, description, created_at, updated_at
            "#,
        )
        .bind(&input.code)
        .bind(&input.name)
        .bind(input.parent_id)
        .bind(&input.description)
        .fetch_one(&self.db)
        .await?;

        Ok(category)
    }
}
