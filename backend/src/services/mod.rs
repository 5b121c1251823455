//! Business logic services for the Stock Management Platform

pub mod alert;
pub mod auth;
pub mod category;
pub mod dashboard;
pub mod inventory;
pub mod movement;
pub mod product;
pub mod user;

pub use alert::AlertService;
pub use auth::AuthService;
pub use category::CategoryService;
pub use dashboard::DashboardService;
pub use inventory::InventoryService;
pub use movement::MovementService;
pub use product::ProductService;
pub use user::UserService;
