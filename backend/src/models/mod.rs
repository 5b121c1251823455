//! Database models for the Stock Management Platform
//!
//! Re-exports the domain vocabulary from the shared crate and adds the
//! reference shapes embedded in API responses. The row types themselves
//! live next to the services that query them.

use serde::Serialize;
use uuid::Uuid;

pub use shared::models::*;

/// Product reference embedded in movement and inventory responses
#[derive(Debug, Clone, Serialize)]
pub struct ProductRef {
    pub id: Uuid,
    pub code: String,
    pub name: String,
}

/// User reference embedded in responses
#[derive(Debug, Clone, Serialize)]
pub struct UserRef {
    pub id: Uuid,
    pub name: String,
}
