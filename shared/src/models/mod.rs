//! Domain models for the Stock Management Platform

mod alert;
mod inventory;
mod movement;
mod user;

pub use alert::*;
pub use inventory::*;
pub use movement::*;
pub use user::*;
