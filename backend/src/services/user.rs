//! User administration (admin-only routes)

use bcrypt::{hash, DEFAULT_COST};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;
use validator::Validate;

use crate::error::{AppError, AppResult};
use crate::models::Role;

/// Service managing user accounts
#[derive(Clone)]
pub struct UserService {
    db: PgPool,
}

/// A user account as shown to administrators
#[derive(Debug, Clone, Serialize)]
pub struct UserAccount {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Input for creating a user
#[derive(Debug, Deserialize, Validate)]
pub struct CreateUserInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
    pub role: Option<Role>,
}

/// Input for updating a user; absent fields are left unchanged
#[derive(Debug, Deserialize, Validate)]
pub struct UpdateUserInput {
    #[validate(length(min = 1, message = "Name cannot be empty"))]
    pub name: Option<String>,
    #[validate(email(message = "A valid email address is required"))]
    pub email: Option<String>,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: Option<String>,
    pub role: Option<Role>,
}

#[derive(Debug, FromRow)]
struct UserAccountRow {
    id: Uuid,
    name: String,
    email: String,
    role: String,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl TryFrom<UserAccountRow> for UserAccount {
    type Error = AppError;

    fn try_from(row: UserAccountRow) -> Result<Self, Self::Error> {
        let role = row
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Internal(format!("Bad role in database: {}", row.role)))?;
        Ok(UserAccount {
            id: row.id,
            name: row.name,
            email: row.email,
            role,
            created_at: row.created_at,
            updated_at: row.updated_at,
        })
    }
}

const USER_SELECT: &str =
    "SELECT id, name, email, role, created_at, updated_at FROM users";

impl UserService {
    /// Create a new UserService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List all users, newest first
    pub async fn list_users(&self) -> AppResult<Vec<UserAccount>> {
        let rows = sqlx::query_as::<_, UserAccountRow>(&format!(
            "{} ORDER BY created_at DESC",
            USER_SELECT
        ))
        .fetch_all(&self.db)
        .await?;

        rows.into_iter().map(UserAccount::try_from).collect()
    }

    /// Get a user by id
    pub async fn get_user(&self, user_id: Uuid) -> AppResult<UserAccount> {
        let row = sqlx::query_as::<_, UserAccountRow>(&format!("{} WHERE id = $1", USER_SELECT))
            .bind(user_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        row.try_into()
    }

    /// Create a user; defaults to the gestionnaire role
    pub async fn create_user(&self, input: CreateUserInput) -> AppResult<UserAccount> {
        input.validate()?;

        let email_taken =
            sqlx::query_scalar::<_, bool>("SELECT EXISTS(SELECT 1 FROM users WHERE email = $1)")
                .bind(&input.email)
                .fetch_one(&self.db)
                .await?;
        if email_taken {
            return Err(AppError::DuplicateEntry("email".to_string()));
        }

        let password_hash = hash(&input.password, DEFAULT_COST)
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;
        let role = input.role.unwrap_or_default();

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(role.as_str())
        .fetch_one(&self.db)
        .await?;

        self.get_user(id).await
    }

    /// Partially update a user
    pub async fn update_user(&self, user_id: Uuid, input: UpdateUserInput) -> AppResult<UserAccount> {
        input.validate()?;

        let current = self.get_user(user_id).await?;

        if let Some(email) = &input.email {
            if email != &current.email {
                let email_taken = sqlx::query_scalar::<_, bool>(
                    "SELECT EXISTS(SELECT 1 FROM users WHERE email = $1 AND id <> $2)",
                )
                .bind(email)
                .bind(user_id)
                .fetch_one(&self.db)
                .await?;
                if email_taken {
                    return Err(AppError::DuplicateEntry("email".to_string()));
                }
            }
        }

        let password_hash = input
            .password
            .as_deref()
            .map(|p| hash(p, DEFAULT_COST))
            .transpose()
            .map_err(|e| AppError::Internal(format!("Password hashing failed: {}", e)))?;

        sqlx::query(
            r#"
            UPDATE users
            SET name = COALESCE($1, name),
                email = COALESCE($2, email),
                password_hash = COALESCE($3, password_hash),
                role = COALESCE($4, role),
                updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .bind(input.role.map(|r| r.as_str()))
        .bind(user_id)
        .execute(&self.db)
        .await?;

        self.get_user(user_id).await
    }

    /// Delete a user. Administrators cannot delete their own account.
    pub async fn delete_user(&self, actor_id: Uuid, user_id: Uuid) -> AppResult<()> {
        if actor_id == user_id {
            return Err(AppError::ValidationError(
                "You cannot delete your own account".to_string(),
            ));
        }

        let result = sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(user_id)
            .execute(&self.db)
            .await?;

        if result.rows_affected() == 0 {
            return Err(AppError::NotFound("User".to_string()));
        }

        Ok(())
    }
}
