use core::str::FromStr;

use serde::{Deserialize, Serialize};

use stockbook_core::LedgerError;

/// Role granted to a principal by the identity provider.
///
/// Stockbook recognizes exactly two roles; mapping roles to concrete
/// permissions happens here rather than in handlers, so the policy has a
/// single home.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Role {
    Admin,
    SuperAdmin,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Admin => "ADMIN",
            Role::SuperAdmin => "SUPER_ADMIN",
        }
    }

    /// Create, update and adjust products.
    pub fn can_manage_products(&self) -> bool {
        matches!(self, Role::Admin | Role::SuperAdmin)
    }

    /// Remove products from the catalog entirely.
    pub fn can_delete_products(&self) -> bool {
        matches!(self, Role::SuperAdmin)
    }
}

impl core::fmt::Display for Role {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Role {
    type Err = LedgerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "ADMIN" => Ok(Role::Admin),
            "SUPER_ADMIN" => Ok(Role::SuperAdmin),
            other => Err(LedgerError::validation(format!("unknown role: {other}"))),
        }
    }
}
