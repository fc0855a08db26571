// Caller identity consumed from the external session layer.
//
// Session issuance and verification live upstream; this core only consumes
// the resulting `{ id, role }` pair for authorization scoping.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Platform-wide caller role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Member,
    Guide,
    Admin,
}

impl Role {
    /// Privileged callers bypass owner/public scoping.
    pub fn is_privileged(&self) -> bool {
        matches!(self, Role::Admin)
    }

    /// Roles allowed to host adventures and schedule events.
    pub fn can_host(&self) -> bool {
        matches!(self, Role::Guide | Role::Admin)
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Member => write!(f, "member"),
            Role::Guide => write!(f, "guide"),
            Role::Admin => write!(f, "admin"),
        }
    }
}

impl std::str::FromStr for Role {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "member" => Ok(Role::Member),
            "guide" => Ok(Role::Guide),
            "admin" => Ok(Role::Admin),
            _ => Err(format!("Invalid role: {}", s)),
        }
    }
}

/// Authenticated caller identity, inserted into request extensions by the
/// session middleware and extracted by handlers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    pub id: Uuid,
    pub role: Role,
}

impl AuthContext {
    pub fn new(id: Uuid, role: Role) -> Self {
        Self { id, role }
    }
}
