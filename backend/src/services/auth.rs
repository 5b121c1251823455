//! Authentication service for registration, login and token issuance
//!
//! Registration follows the first-admin rule: it stays open only while no
//! admin account exists, and the first account created becomes admin. The
//! "does an admin exist" question is re-derived by query on every call, so
//! deleting the last admin reopens registration without any cached state.

use bcrypt::{hash, verify, DEFAULT_COST};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, EncodingKey, Header};
use serde::{Deserialize, Serialize};
use sqlx::PgPool;
use uuid::Uuid;
use validator::Validate;

use crate::config::Config;
use crate::error::{AppError, AppResult};
use crate::models::Role;

/// Authentication service
#[derive(Clone)]
pub struct AuthService {
    db: PgPool,
    jwt_secret: String,
    access_token_expiry: i64,
}

/// Input for registering the first account
#[derive(Debug, Deserialize, Validate)]
pub struct RegisterInput {
    #[validate(length(min = 1, message = "Name is required"))]
    pub name: String,
    #[validate(email(message = "A valid email address is required"))]
    pub email: String,
    #[validate(length(min = 6, message = "Password must be at least 6 characters"))]
    pub password: String,
}

/// Public view of a user account
#[derive(Debug, Clone, Serialize)]
pub struct UserProfile {
    pub id: Uuid,
    pub name: String,
    pub email: String,
    pub role: Role,
}

/// Response after a successful login
#[derive(Debug, Serialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Whether registration is currently open
#[derive(Debug, Serialize)]
pub struct RegistrationStatus {
    pub can_register: bool,
    pub message: String,
}

/// JWT claims structure
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: i64,
    pub iat: i64,
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    id: Uuid,
    name: String,
    email: String,
    password_hash: String,
    role: String,
}

impl AuthService {
    /// Create a new AuthService instance
    pub fn new(db: PgPool, config: &Config) -> Self {
        Self {
            db,
            jwt_secret: config.jwt.secret.clone(),
            access_token_expiry: config.jwt.access_token_expiry,
        }
    }

    /// Whether registration is open (no admin account exists yet)
    pub async fn registration_status(&self) -> AppResult<RegistrationStatus> {
        let admin_exists = self.admin_exists().await?;
        Ok(RegistrationStatus {
            can_register: !admin_exists,
            message: if admin_exists {
                "An administrator already exists. Registration is disabled.".to_string()
            } else {
                "Registration is open. The first account will be administrator.".to_string()
            },
        })
    }

    /// Register the first account, which becomes admin. Blocked as soon as
    /// an admin exists.
    pub async fn register(&self, input: RegisterInput) -> AppResult<UserProfile> {
        if self.admin_exists().await? {
            return Err(AppError::Forbidden(
                "Registration is disabled. Contact an administrator to create an account."
                    .to_string(),
            ));
        }

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

        let id = sqlx::query_scalar::<_, Uuid>(
            r#"
            INSERT INTO users (name, email, password_hash, role)
            VALUES ($1, $2, $3, 'admin')
            RETURNING id
            "#,
        )
        .bind(&input.name)
        .bind(&input.email)
        .bind(&password_hash)
        .fetch_one(&self.db)
        .await?;

        tracing::info!(user_id = %id, "first administrator account created");

        Ok(UserProfile {
            id,
            name: input.name,
            email: input.email,
            role: Role::Admin,
        })
    }

    /// Authenticate with email and password
    pub async fn login(&self, email: &str, password: &str) -> AppResult<LoginResponse> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role FROM users WHERE email = $1",
        )
        .bind(email)
        .fetch_optional(&self.db)
        .await?
        .ok_or(AppError::InvalidCredentials)?;

        let valid = verify(password, &user.password_hash)
            .map_err(|e| AppError::Internal(format!("Password verification failed: {}", e)))?;
        if !valid {
            return Err(AppError::InvalidCredentials);
        }

        let role = user
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Internal(format!("Bad role in database: {}", user.role)))?;

        let token = self.generate_token(user.id, role)?;

        Ok(LoginResponse {
            token,
            user: UserProfile {
                id: user.id,
                name: user.name,
                email: user.email,
                role,
            },
        })
    }

    /// Get the profile of the authenticated user
    pub async fn me(&self, user_id: Uuid) -> AppResult<UserProfile> {
        let user = sqlx::query_as::<_, UserRow>(
            "SELECT id, name, email, password_hash, role FROM users WHERE id = $1",
        )
        .bind(user_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("User".to_string()))?;

        let role = user
            .role
            .parse::<Role>()
            .map_err(|_| AppError::Internal(format!("Bad role in database: {}", user.role)))?;

        Ok(UserProfile {
            id: user.id,
            name: user.name,
            email: user.email,
            role,
        })
    }

    /// Sign an access token for the user
    fn generate_token(&self, user_id: Uuid, role: Role) -> AppResult<String> {
        let now = Utc::now();
        let claims = Claims {
            sub: user_id.to_string(),
            role: role.as_str().to_string(),
            exp: (now + Duration::seconds(self.access_token_expiry)).timestamp(),
            iat: now.timestamp(),
        };

        encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_bytes()),
        )
        .map_err(|e| AppError::Internal(format!("Token signing failed: {}", e)))
    }

    async fn admin_exists(&self) -> AppResult<bool> {
        let exists = sqlx::query_scalar::<_, bool>(
            "SELECT EXISTS(SELECT 1 FROM users WHERE role = 'admin')",
        )
        .fetch_one(&self.db)
        .await?;
        Ok(exists)
    }
}
