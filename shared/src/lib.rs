//! Shared types and rules for the Stock Management Platform
//!
//! This crate contains the domain vocabulary (movement directions and
//! categories, inventory statuses, alert types, user roles) and the pure
//! stock-consistency rules used by the backend services. Nothing here
//! touches the database, so the rules can be exercised directly in tests.

pub mod models;
pub mod types;
pub mod validation;

pub use models::*;
pub use types::*;
pub use validation::*;
