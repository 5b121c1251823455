//! Stock movement vocabulary
//!
//! A movement is either an entry ("entree") or an exit ("sortie"), and its
//! category must be drawn from the fixed set allowed for that direction.
//! The wire values are kept in French to stay compatible with the existing
//! frontend.

use serde::{Deserialize, Serialize};

/// Direction of a stock movement
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub enum MovementDirection {
    #[serde(rename = "entree")]
    Entry,
    #[serde(rename = "sortie")]
    Exit,
}

impl MovementDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementDirection::Entry => "entree",
            MovementDirection::Exit => "sortie",
        }
    }

    /// The inverse direction, used when reversing a movement.
    pub fn inverse(&self) -> Self {
        match self {
            MovementDirection::Entry => MovementDirection::Exit,
            MovementDirection::Exit => MovementDirection::Entry,
        }
    }
}

impl std::str::FromStr for MovementDirection {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "entree" => Ok(MovementDirection::Entry),
            "sortie" => Ok(MovementDirection::Exit),
            _ => Err("unknown movement direction"),
        }
    }
}

/// Category of a stock movement
///
/// Entry categories: achat, retour, correction.
/// Exit categories: vente, perte, casse, expiration.
/// `Correction` is also emitted by inventory completion on the exit side.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MovementCategory {
    Achat,
    Retour,
    Correction,
    Vente,
    Perte,
    Casse,
    Expiration,
}

impl MovementCategory {
    pub fn as_str(&self) -> &'static str {
        match self {
            MovementCategory::Achat => "achat",
            MovementCategory::Retour => "retour",
            MovementCategory::Correction => "correction",
            MovementCategory::Vente => "vente",
            MovementCategory::Perte => "perte",
            MovementCategory::Casse => "casse",
            MovementCategory::Expiration => "expiration",
        }
    }

    /// Categories allowed for entry movements
    pub fn entry_categories() -> &'static [MovementCategory] {
        &[
            MovementCategory::Achat,
            MovementCategory::Retour,
            MovementCategory::Correction,
        ]
    }

    /// Categories allowed for exit movements
    ///
    /// Correction exits exist in the ledger (inventory completion records a
    /// negative difference as one) but cannot be created through the
    /// movement API, so the two sets stay disjoint.
    pub fn exit_categories() -> &'static [MovementCategory] {
        &[
            MovementCategory::Vente,
            MovementCategory::Perte,
            MovementCategory::Casse,
            MovementCategory::Expiration,
        ]
    }

    /// Whether this category is valid for the given direction
    pub fn allowed_for(&self, direction: MovementDirection) -> bool {
        match direction {
            MovementDirection::Entry => Self::entry_categories().contains(self),
            MovementDirection::Exit => Self::exit_categories().contains(self),
        }
    }
}

impl std::str::FromStr for MovementCategory {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "achat" => Ok(MovementCategory::Achat),
            "retour" => Ok(MovementCategory::Retour),
            "correction" => Ok(MovementCategory::Correction),
            "vente" => Ok(MovementCategory::Vente),
            "perte" => Ok(MovementCategory::Perte),
            "casse" => Ok(MovementCategory::Casse),
            "expiration" => Ok(MovementCategory::Expiration),
            _ => Err("unknown movement category"),
        }
    }
}
