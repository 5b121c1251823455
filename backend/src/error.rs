//! Error handling for the Stock Management Platform
//!
//! Every engine-level failure surfaces as a structured JSON error with a
//! stable code; business-rule violations map to 400, missing resources to
//! 404, everything unexpected to 500.

use std::collections::HashMap;

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use thiserror::Error;

/// Application error types
#[derive(Error, Debug)]
pub enum AppError {
    // Authentication errors
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Token expired")]
    TokenExpired,

    #[error("Invalid token")]
    InvalidToken,

    #[error("Forbidden: {0}")]
    Forbidden(String),

    // Validation errors
    #[error("Validation error on {field}: {message}")]
    Validation { field: String, message: String },

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("Validation failed")]
    FieldErrors(HashMap<String, String>),

    #[error("Duplicate entry: {0}")]
    DuplicateEntry(String),

    #[error("Resource not found: {0}")]
    NotFound(String),

    // Stock mutation errors
    #[error("Insufficient stock: {available} available, {requested} requested")]
    InsufficientStock { available: i32, requested: i32 },

    #[error("Reversing this movement would make the stock negative")]
    NegativeStock,

    // Inventory reconciliation errors
    #[error("Inventory is not in draft status")]
    InventoryNotDraft,

    #[error("Inventory is already completed")]
    AlreadyCompleted,

    #[error("A completed inventory cannot be deleted")]
    InventoryCompleted,

    #[error("Product already counted in this inventory")]
    DuplicateItem,

    // Database errors
    #[error("Database error: {0}")]
    DatabaseError(#[from] sqlx::Error),

    // Internal errors
    #[error("Internal server error: {0}")]
    Internal(String),

    #[error("Internal server error")]
    InternalError(#[from] anyhow::Error),
}

/// Error response structure
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorDetail,
}

#[derive(Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<String>,
    /// Field-level detail map for validation failures
    #[serde(skip_serializing_if = "Option::is_none")]
    pub errors: Option<HashMap<String, String>>,
}

impl ErrorDetail {
    fn new(code: &str, message: impl Into<String>) -> Self {
        Self {
            code: code.to_string(),
            message: message.into(),
            field: None,
            errors: None,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, detail) = match &self {
            AppError::InvalidCredentials => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_CREDENTIALS", "Invalid email or password"),
            ),
            AppError::TokenExpired => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("TOKEN_EXPIRED", "Token has expired"),
            ),
            AppError::InvalidToken => (
                StatusCode::UNAUTHORIZED,
                ErrorDetail::new("INVALID_TOKEN", "Invalid token"),
            ),
            AppError::Forbidden(msg) => {
                (StatusCode::FORBIDDEN, ErrorDetail::new("FORBIDDEN", msg))
            }
            AppError::Validation { field, message } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", message)
                },
            ),
            AppError::ValidationError(msg) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("VALIDATION_ERROR", msg),
            ),
            AppError::FieldErrors(errors) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    errors: Some(errors.clone()),
                    ..ErrorDetail::new("VALIDATION_ERROR", "Invalid input data")
                },
            ),
            AppError::DuplicateEntry(field) => (
                StatusCode::BAD_REQUEST,
                ErrorDetail {
                    field: Some(field.clone()),
                    ..ErrorDetail::new(
                        "DUPLICATE_ENTRY",
                        format!("A record with this {} already exists", field),
                    )
                },
            ),
            AppError::NotFound(resource) => (
                StatusCode::NOT_FOUND,
                ErrorDetail::new("NOT_FOUND", format!("{} not found", resource)),
            ),
            AppError::InsufficientStock {
                available,
                requested,
            } => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INSUFFICIENT_STOCK",
                    format!(
                        "Insufficient stock: {} available, {} requested",
                        available, requested
                    ),
                ),
            ),
            AppError::NegativeStock => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "NEGATIVE_STOCK",
                    "Cannot delete this movement: the stock would become negative",
                ),
            ),
            AppError::InventoryNotDraft => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVENTORY_NOT_DRAFT",
                    "This inventory is no longer in draft status",
                ),
            ),
            AppError::AlreadyCompleted => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new("ALREADY_COMPLETED", "This inventory is already completed"),
            ),
            AppError::InventoryCompleted => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "INVENTORY_COMPLETED",
                    "A completed inventory cannot be deleted",
                ),
            ),
            AppError::DuplicateItem => (
                StatusCode::BAD_REQUEST,
                ErrorDetail::new(
                    "DUPLICATE_ITEM",
                    "This product is already counted in this inventory",
                ),
            ),
            AppError::DatabaseError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("DATABASE_ERROR", "A database error occurred"),
            ),
            AppError::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", msg),
            ),
            AppError::InternalError(_) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                ErrorDetail::new("INTERNAL_ERROR", "An internal server error occurred"),
            ),
        };

        if status.is_server_error() {
            tracing::error!("Error: {:?}", self);
        } else {
            tracing::debug!("Request rejected: {:?}", self);
        }

        (status, Json(ErrorResponse { error: detail })).into_response()
    }
}

impl From<validator::ValidationErrors> for AppError {
    fn from(errors: validator::ValidationErrors) -> Self {
        let map = errors
            .field_errors()
            .into_iter()
            .map(|(field, errs)| {
                let message = errs
                    .first()
                    .and_then(|e| e.message.as_ref())
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| format!("Invalid value for {}", field));
                (field.to_string(), message)
            })
            .collect();
        AppError::FieldErrors(map)
    }
}

/// Result type alias for handlers
pub type AppResult<T> = Result<T, AppError>;
