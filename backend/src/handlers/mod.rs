//! HTTP handlers for the Stock Management Platform

pub mod alert;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod health;
pub mod inventory;
pub mod movement;
pub mod product;
pub mod user;

pub use alert::*;
pub use auth::*;
pub use category::*;
pub use dashboard::*;
pub use health::*;
pub use inventory::*;
pub use movement::*;
pub use product::*;
pub use user::*;
