use serde::{Deserialize, Serialize};

use stockbook_core::PrincipalId;

use crate::{AccessClaims, Role};

/// An authenticated caller, as the rest of the system sees one.
///
/// Built from verified token claims and nothing else; handlers receive a
/// `Principal` and never touch the raw token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
    pub id: PrincipalId,
    pub name: String,
    pub role: Role,
}

impl From<&AccessClaims> for Principal {
    fn from(claims: &AccessClaims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name.clone(),
            role: claims.role,
        }
    }
}
