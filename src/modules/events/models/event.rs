// Scheduled departure of an adventure.
//
// Events belong to an adventure and are organized by its host; rows
// hard-delete, cancellations are kept via status.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::query::{Sort, SortDirection, Value};
use crate::service::{AccessRule, EntityPolicy, FieldKind, FilterableField, Matching};
use crate::store::entity::{Entity, Patch};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "VARCHAR(16)", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Scheduled,
    Cancelled,
    Completed,
}

impl Default for EventStatus {
    fn default() -> Self {
        EventStatus::Scheduled
    }
}

impl std::fmt::Display for EventStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EventStatus::Scheduled => write!(f, "scheduled"),
            EventStatus::Cancelled => write!(f, "cancelled"),
            EventStatus::Completed => write!(f, "completed"),
        }
    }
}

impl std::str::FromStr for EventStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "scheduled" => Ok(EventStatus::Scheduled),
            "cancelled" => Ok(EventStatus::Cancelled),
            "completed" => Ok(EventStatus::Completed),
            _ => Err(format!("Invalid event status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Event {
    pub id: Uuid,
    pub adventure_id: Uuid,
    pub organizer_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
    pub status: EventStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Event {
    pub fn new(
        adventure_id: Uuid,
        organizer_id: Uuid,
        title: String,
        starts_at: DateTime<Utc>,
        capacity: i32,
    ) -> Result<Self> {
        if title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if capacity < 1 {
            return Err(AppError::validation("Capacity must be at least 1"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            adventure_id,
            organizer_id,
            title,
            starts_at,
            capacity,
            status: EventStatus::Scheduled,
            created_at: now,
            updated_at: now,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreateEventRequest {
    pub adventure_id: Uuid,
    pub title: String,
    pub starts_at: DateTime<Utc>,
    pub capacity: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateEventRequest {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct EventPatch {
    pub title: Option<String>,
    pub starts_at: Option<DateTime<Utc>>,
    pub capacity: Option<i32>,
    pub status: Option<EventStatus>,
}

impl Patch<Event> for EventPatch {
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut assignments = Vec::new();
        if let Some(title) = &self.title {
            assignments.push(("title", Value::Text(title.clone())));
        }
        if let Some(starts_at) = self.starts_at {
            assignments.push(("starts_at", Value::Timestamp(starts_at)));
        }
        if let Some(capacity) = self.capacity {
            assignments.push(("capacity", Value::Int(i64::from(capacity))));
        }
        if let Some(status) = self.status {
            assignments.push(("status", Value::Text(status.to_string())));
        }
        assignments
    }

    fn apply(&self, entity: &mut Event) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(starts_at) = self.starts_at {
            entity.starts_at = starts_at;
        }
        if let Some(capacity) = self.capacity {
            entity.capacity = capacity;
        }
        if let Some(status) = self.status {
            entity.status = status;
        }
    }
}

impl Entity for Event {
    type Patch = EventPatch;

    fn table() -> &'static str {
        "events"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "adventure_id",
            "organizer_id",
            "title",
            "starts_at",
            "capacity",
            "status",
            "created_at",
            "updated_at",
        ]
    }

    fn id(&self) -> Uuid {
        self.id
    }

    fn field(&self, column: &str) -> Option<Value> {
        match column {
            "id" => Some(Value::Uuid(self.id)),
            "adventure_id" => Some(Value::Uuid(self.adventure_id)),
            "organizer_id" => Some(Value::Uuid(self.organizer_id)),
            "title" => Some(Value::Text(self.title.clone())),
            "starts_at" => Some(Value::Timestamp(self.starts_at)),
            "capacity" => Some(Value::Int(i64::from(self.capacity))),
            "status" => Some(Value::Text(self.status.to_string())),
            "created_at" => Some(Value::Timestamp(self.created_at)),
            "updated_at" => Some(Value::Timestamp(self.updated_at)),
            _ => None,
        }
    }

    fn insert_values(&self) -> Vec<(&'static str, Value)> {
        vec![
            ("id", Value::Uuid(self.id)),
            ("adventure_id", Value::Uuid(self.adventure_id)),
            ("organizer_id", Value::Uuid(self.organizer_id)),
            ("title", Value::Text(self.title.clone())),
            ("starts_at", Value::Timestamp(self.starts_at)),
            ("capacity", Value::Int(i64::from(self.capacity))),
            ("status", Value::Text(self.status.to_string())),
            ("created_at", Value::Timestamp(self.created_at)),
            ("updated_at", Value::Timestamp(self.updated_at)),
        ]
    }

    fn touch(&mut self, at: DateTime<Utc>) {
        self.updated_at = at;
    }
}

pub const EVENT_POLICY: EntityPolicy = EntityPolicy {
    filterable: &[
        FilterableField {
            column: "status",
            kind: FieldKind::Keyword,
            matching: Matching::SetMember,
        },
        FilterableField {
            column: "adventure_id",
            kind: FieldKind::Uuid,
            matching: Matching::Exact,
        },
        FilterableField {
            column: "title",
            kind: FieldKind::Text,
            matching: Matching::Substring,
        },
    ],
    sortable: &["starts_at", "created_at", "title"],
    default_sort: Sort {
        column: "starts_at",
        direction: SortDirection::Asc,
    },
    access: AccessRule {
        owner_column: Some("organizer_id"),
        public: Some(("status", "scheduled")),
    },
};
