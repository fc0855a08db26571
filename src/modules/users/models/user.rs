// User account model.
//
// Accounts soft-delete: `deleted_at` marks the row and the generic layer
// excludes marked rows from reads unless explicitly included. The referral
// code is a generated short code, unique alongside the email address.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::auth::Role;
use crate::core::error::{AppError, Result};
use crate::core::query::{Sort, SortDirection, Value};
use crate::service::{AccessRule, EntityPolicy, FieldKind, FilterableField, Matching};
use crate::store::entity::{Entity, Patch};

pub const REFERRAL_CODE_LENGTH: usize = 8;

/// Account lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum UserStatus {
    Active,
    Suspended,
}

impl Default for UserStatus {
    fn default() -> Self {
        UserStatus::Active
    }
}

impl std::fmt::Display for UserStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            UserStatus::Active => write!(f, "active"),
            UserStatus::Suspended => write!(f, "suspended"),
        }
    }
}

impl std::str::FromStr for UserStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "active" => Ok(UserStatus::Active),
            "suspended" => Ok(UserStatus::Suspended),
            _ => Err(format!("Invalid user status: {}", s)),
        }
    }
}

/// A platform member account
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: Uuid,
    pub email: String,
    pub display_name: String,
    pub role: Role,
    pub referral_code: String,
    pub status: UserStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl User {
    /// Create a new member account with validation.
    ///
    /// Callers pass an already-normalized email (trimmed, lowercased) and a
    /// generated referral code.
    pub fn new(email: String, display_name: String, referral_code: String) -> Result<Self> {
        Self::validate_email(&email)?;
        Self::validate_display_name(&display_name)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            email,
            display_name,
            role: Role::Member,
            referral_code,
            status: UserStatus::Active,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }

    fn validate_email(email: &str) -> Result<()> {
        if email.is_empty() || !email.contains('@') {
            return Err(AppError::validation("Email address is not valid"));
        }
        if email.len() > 255 {
            return Err(AppError::validation("Email cannot exceed 255 characters"));
        }
        Ok(())
    }

    fn validate_display_name(display_name: &str) -> Result<()> {
        if display_name.is_empty() {
            return Err(AppError::validation("Display name cannot be empty"));
        }
        if display_name.len() > 100 {
            return Err(AppError::validation(
                "Display name cannot exceed 100 characters",
            ));
        }
        Ok(())
    }
}

/// Registration payload, pre-validated at the boundary
#[derive(Debug, Clone, Deserialize)]
pub struct CreateUserRequest {
    pub email: String,
    pub display_name: String,
}

/// Account update payload; role changes are admin-only
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserRequest {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

/// Partial update applied through the generic layer
#[derive(Debug, Clone, Default)]
pub struct UserPatch {
    pub email: Option<String>,
    pub display_name: Option<String>,
    pub role: Option<Role>,
    pub status: Option<UserStatus>,
}

impl Patch<User> for UserPatch {
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut assignments = Vec::new();
        if let Some(email) = &self.email {
            assignments.push(("email", Value::Text(email.clone())));
        }
        if let Some(display_name) = &self.display_name {
            assignments.push(("display_name", Value::Text(display_name.clone())));
        }
        if let Some(role) = self.role {
            assignments.push(("role", Value::Text(role.to_string())));
        }
        if let Some(status) = self.status {
            assignments.push(("status", Value::Text(status.to_string())));
        }
        assignments
    }

    fn apply(&self, entity: &mut User) {
        if let Some(email) = &self.email {
            entity.email = email.clone();
        }
        if let Some(display_name) = &self.display_name {
            entity.display_name = display_name.clone();
        }
        if let Some(role) = self.role {
            entity.role = role;
        }
        if let Some(status) = self.status {
            entity.status = status;
        }
    }
}

impl Entity for User {
    type Patch = UserPatch;

    fn table() -> &'static str {
        "users"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "email",
            "display_name",
            "role",
            "referral_code",
            "status",
            "created_at",
            "updated_at",
            "deleted_at",
        ]
    }

    fn unique_columns() -> &'static [&'static str] {
        &["email", "referral_code"]
    }

    fn soft_delete_column() -> Option<&'static str> {
        Some("deleted_at")
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Uuid(self.id)),
            "email" => Some(Value::Text(self.email.clone())),
            "display_name" => Some(Value::Text(self.display_name.clone())),
            "role" => Some(Value::Text(self.role.to_string())),
            "referral_code" => Some(Value::Text(self.referral_code.clone())),
            "status" => Some(Value::Text(self.status.to_string())),
            "created_at" => Some(Value::Timestamp(self.created_at)),
            "updated_at" => Some(Value::Timestamp(self.updated_at)),
            "deleted_at" => self.deleted_at.map(Value::Timestamp),
            _ => None,
        }
    }

    fn insert_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Uuid(self.id)),
            ("email", Value::Text(self.email.clone())),
            ("display_name", Value::Text(self.display_name.clone())),
            ("role", Value::Text(self.role.to_string())),
            ("referral_code", Value::Text(self.referral_code.clone())),
            ("status", Value::Text(self.status.to_string())),
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
        ]
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }

    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.deleted_at = Some(at);
    }
}

pub const USER_POLICY: EntityPolicy = EntityPolicy {
    filterable: &[
        FilterableField {
            column: "role",
            kind: FieldKind::Keyword,
            matching: Matching::SetMember,
        },
        FilterableField {
            column: "status",
            kind: FieldKind::Keyword,
            matching: Matching::SetMember,
        },
        FilterableField {
            column: "display_name",
            kind: FieldKind::Text,
            matching: Matching::Substring,
        },
        FilterableField {
            column: "email",
            kind: FieldKind::Keyword,
            matching: Matching::Exact,
        },
    ],
    sortable: &["created_at", "display_name", "email"],
    default_sort: Sort {
        column: "created_at",
        direction: SortDirection::Desc,
    },
    access: AccessRule {
        owner_column: Some("id"),
        public: Some(("status", "active")),
    },
};
