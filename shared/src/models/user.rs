//! User roles

use serde::{Deserialize, Serialize};

/// Role of a user account
///
/// Admin manages users; gestionnaire operates the stock; observateur is
/// read-only at the frontend level. The backend only enforces the admin
/// gate on user management routes.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    #[default]
    Gestionnaire,
    Observateur,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "admin",
            Role::Gestionnaire => "gestionnaire",
            Role::Observateur => "observateur",
        }
    }

    pub fn is_admin(&self) -> bool {
        matches!(self, Role::Admin)
    }
}

impl std::str::FromStr for Role {
    type Err = &'static str;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Role::Admin),
            "gestionnaire" => Ok(Role::Gestionnaire),
            "observateur" => Ok(Role::Observateur),
            _ => Err("unknown role"),
        }
    }
}
