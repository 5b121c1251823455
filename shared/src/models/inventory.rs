//! Physical inventory count models

use serde::{Deserialize, Serialize};

/// Lifecycle status of an inventory count session
///
/// Created as `Draft`; items can only be touched while draft. The transition
/// to `Completed` is one-way. `Archived` is reserved for future use.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum InventoryStatus {
    Draft,
    Completed,
    Archived,
}

impl InventoryStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            InventoryStatus::Draft => "draft",
            InventoryStatus::Completed => "completed",
            InventoryStatus::Archived => "archived",
        }
    }

    pub fn is_draft(&self) -> bool {
        matches!(self, InventoryStatus::Draft)
    }
}

impl std::str::FromStr for InventoryStatus {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "draft" => Ok(InventoryStatus::Draft),
            "completed" => Ok(InventoryStatus::Completed),
            "archived" => Ok(InventoryStatus::Archived),
            _ => Err("unknown inventory status"),
        }
    }
}
