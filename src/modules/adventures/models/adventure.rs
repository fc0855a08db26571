// Adventure listing model.
//
// An adventure is a bookable trip offered by a host. The join code is a
// generated short code guests use to reference the trip; rows hard-delete
// since archived listings are kept via status instead.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::query::{Sort, SortDirection, Value};
use crate::service::{AccessRule, EntityPolicy, FieldKind, FilterableField, Matching};
use crate::store::entity::{Entity, Patch};

pub const JOIN_CODE_LENGTH: usize = 8;

/// Listing visibility lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum AdventureStatus {
    Draft,
    Published,
    Archived,
}

impl Default for AdventureStatus {
    fn default() -> Self {
        AdventureStatus::Draft
    }
}

impl std::fmt::Display for AdventureStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AdventureStatus::Draft => write!(f, "draft"),
            AdventureStatus::Published => write!(f, "published"),
            AdventureStatus::Archived => write!(f, "archived"),
        }
    }
}

impl std::str::FromStr for AdventureStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(AdventureStatus::Draft),
            "published" => Ok(AdventureStatus::Published),
            "archived" => Ok(AdventureStatus::Archived),
            _ => Err(format!("Invalid adventure status: {}", s)),
        }
    }
}

/// A bookable trip listing
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Adventure {
    pub id: Uuid,
    pub host_id: Uuid,
    pub title: String,
    pub summary: Option<String>,
    pub location: String,
    pub capacity: i32,
    pub price_per_person: Decimal,
    pub join_code: String,
    pub status: AdventureStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Adventure {
    pub fn new(
        host_id: Uuid,
        title: String,
        summary: Option<String>,
        location: String,
        capacity: i32,
        price_per_person: Decimal,
        join_code: String,
    ) -> Result<Self> {
        Self::validate_title(&title)?;
        Self::validate_location(&location)?;
        Self::validate_capacity(capacity)?;
        Self::validate_price(price_per_person)?;

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            host_id,
            title,
            summary,
            location,
            capacity,
            price_per_person,
            join_code,
            status: AdventureStatus::Draft,
            created_at: now,
            updated_at: now,
        })
    }

    fn validate_title(title: &str) -> Result<()> {
        if title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if title.len() > 150 {
            return Err(AppError::validation("Title cannot exceed 150 characters"));
        }
        Ok(())
    }

    fn validate_location(location: &str) -> Result<()> {
        if location.is_empty() {
            return Err(AppError::validation("Location cannot be empty"));
        }
        Ok(())
    }

    fn validate_capacity(capacity: i32) -> Result<()> {
        if capacity < 1 {
            return Err(AppError::validation("Capacity must be at least 1"));
        }
        Ok(())
    }

    fn validate_price(price: Decimal) -> Result<()> {
        if price < Decimal::ZERO {
            return Err(AppError::validation("Price cannot be negative"));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateAdventureRequest {
    pub title: String,
    pub summary: Option<String>,
    pub location: String,
    pub capacity: i32,
    pub price_per_person: Decimal,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateAdventureRequest {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_person: Option<Decimal>,
    pub status: Option<AdventureStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct AdventurePatch {
    pub title: Option<String>,
    pub summary: Option<String>,
    pub location: Option<String>,
    pub capacity: Option<i32>,
    pub price_per_person: Option<Decimal>,
    pub status: Option<AdventureStatus>,
}

impl Patch<Adventure> for AdventurePatch {
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut assignments = Vec::new();
        if let Some(title) = &self.title {
            assignments.push(("title", Value::Text(title.clone())));
        }
        if let Some(summary) = &self.summary {
            assignments.push(("summary", Value::Text(summary.clone())));
        }
        if let Some(location) = &self.location {
            assignments.push(("location", Value::Text(location.clone())));
        }
        if let Some(capacity) = self.capacity {
            assignments.push(("capacity", Value::Int(i64::from(capacity))));
        }
        if let Some(price) = self.price_per_person {
            assignments.push(("price_per_person", Value::Decimal(price)));
        }
        if let Some(status) = self.status {
            assignments.push(("status", Value::Text(status.to_string())));
        }
        assignments
    }

    fn apply(&self, entity: &mut Adventure) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(summary) = &self.summary {
            entity.summary = Some(summary.clone());
        }
        if let Some(location) = &self.location {
            entity.location = location.clone();
        }
        if let Some(capacity) = self.capacity {
            entity.capacity = capacity;
        }
        if let Some(price) = self.price_per_person {
            entity.price_per_person = price;
        }
        if let Some(status) = self.status {
            entity.status = status;
        }
    }
}

impl Entity for Adventure {
    type Patch = AdventurePatch;

    fn table() -> &'static str {
        "adventures"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "host_id",
            "title",
            "summary",
            "location",
            "capacity",
            "price_per_person",
            "join_code",
            "status",
            "created_at",
            "updated_at",
        ]
    }

    fn unique_columns() -> &'static [&'static str] {
        &["join_code"]
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Uuid(self.id)),
            "host_id" => Some(Value::Uuid(self.host_id)),
            "title" => Some(Value::Text(self.title.clone())),
            "summary" => self.summary.clone().map(Value::Text),
            "location" => Some(Value::Text(self.location.clone())),
            "capacity" => Some(Value::Int(i64::from(self.capacity))),
            "price_per_person" => Some(Value::Decimal(self.price_per_person)),
            "join_code" => Some(Value::Text(self.join_code.clone())),
            "status" => Some(Value::Text(self.status.to_string())),
            "created_at" => Some(Value::Timestamp(self.created_at)),
            "updated_at" => Some(Value::Timestamp(self.updated_at)),
            _ => None,
        }
    }

    fn insert_values(&self) -> Vec<(&'static str, Value)> {
        let mut values = vec![
            ("id", Value::Uuid(self.id)),
            ("host_id", Value::Uuid(self.host_id)),
            ("title", Value::Text(self.title.clone())),
        ];
        if let Some(summary) = &self.summary {
            values.push(("summary", Value::Text(summary.clone())));
        }
        values.extend([
            ("location", Value::Text(self.location.clone())),
            ("capacity", Value::Int(i64::from(self.capacity))),
            ("price_per_person", Value::Decimal(self.price_per_person)),
            ("join_code", Value::Text(self.join_code.clone())),
            ("status", Value::Text(self.status.to_string())),
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
        ]);
        values
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

pub const ADVENTURE_POLICY: EntityPolicy = EntityPolicy {
    filterable: &[
        FilterableField {
            column: "status",
            kind: FieldKind::Keyword,
            matching: Matching::SetMember,
        },
        FilterableField {
            column: "title",
            kind: FieldKind::Text,
            matching: Matching::Substring,
        },
        FilterableField {
            column: "location",
            kind: FieldKind::Text,
            matching: Matching::Substring,
        },
        FilterableField {
            column: "host_id",
            kind: FieldKind::Uuid,
            matching: Matching::Exact,
        },
    ],
    sortable: &["created_at", "title", "price_per_person"],
    default_sort: Sort {
        column: "created_at",
        direction: SortDirection::Desc,
    },
    access: AccessRule {
        owner_column: Some("host_id"),
        public: Some(("status", "published")),
    },
};
