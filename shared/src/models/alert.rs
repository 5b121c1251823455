//! Stock alert vocabulary

use serde::{Deserialize, Serialize};

use crate::types::Severity;

/// Kinds of stock alerts
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AlertType {
    /// Out of stock (stock == 0)
    Rupture,
    /// At or below the minimum threshold (0 < stock <= min_stock)
    Seuil,
    /// Above the optimal level (optimal_stock > 0 and stock > optimal_stock)
    Surstock,
}

impl AlertType {
    pub fn as_str(&self) -> &'static str {
        match self {
            AlertType::Rupture => "rupture",
            AlertType::Seuil => "seuil",
            AlertType::Surstock => "surstock",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            AlertType::Rupture => Severity::Critical,
            AlertType::Seuil => Severity::Warning,
            AlertType::Surstock => Severity::Info,
        }
    }
}

impl std::str::FromStr for AlertType {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "rupture" => Ok(AlertType::Rupture),
            "seuil" => Ok(AlertType::Seuil),
            "surstock" => Ok(AlertType::Surstock),
            _ => Err("unknown alert type"),
        }
    }
}
