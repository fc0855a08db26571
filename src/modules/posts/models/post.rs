// Community post model.
//
// Posts soft-delete so moderation can restore them; drafts are visible to
// their author only, published posts to everyone.

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
pub enum PostStatus {
    Draft,
    Published,
}

impl Default for PostStatus {
    fn default() -> Self {
        PostStatus::Draft
    }
}

impl std::fmt::Display for PostStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PostStatus::Draft => write!(f, "draft"),
            PostStatus::Published => write!(f, "published"),
        }
    }
}

impl std::str::FromStr for PostStatus {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "draft" => Ok(PostStatus::Draft),
            "published" => Ok(PostStatus::Published),
            _ => Err(format!("Invalid post status: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub body: String,
    pub status: PostStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

impl Post {
    pub fn new(author_id: Uuid, title: String, body: String, status: PostStatus) -> Result<Self> {
        if title.is_empty() {
            return Err(AppError::validation("Title cannot be empty"));
        }
        if title.len() > 200 {
            return Err(AppError::validation("Title cannot exceed 200 characters"));
        }
        if body.is_empty() {
            return Err(AppError::validation("Body cannot be empty"));
        }

        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            body,
            status,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        })
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct CreatePostRequest {
    pub title: String,
    pub body: String,
    #[serde(default)]
    pub status: PostStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdatePostRequest {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
}

#[derive(Debug, Clone, Default)]
pub struct PostPatch {
    pub title: Option<String>,
    pub body: Option<String>,
    pub status: Option<PostStatus>,
}

impl Patch<Post> for PostPatch {
    fn assignments(&self) -> Vec<(&'static str, Value)> {
        let mut assignments = Vec::new();
        if let Some(title) = &self.title {
            assignments.push(("title", Value::Text(title.clone())));
        }
        if let Some(body) = &self.body {
            assignments.push(("body", Value::Text(body.clone())));
        }
        if let Some(status) = self.status {
            assignments.push(("status", Value::Text(status.to_string())));
        }
        assignments
    }

    fn apply(&self, entity: &mut Post) {
        if let Some(title) = &self.title {
            entity.title = title.clone();
        }
        if let Some(body) = &self.body {
            entity.body = body.clone();
        }
        if let Some(status) = self.status {
            entity.status = status;
        }
    }
}

impl Entity for Post {
    type Patch = PostPatch;

    fn table() -> &'static str {
        "posts"
    }

    fn columns() -> &'static [&'static str] {
        &[
            "id",
            "author_id",
            "title",
            "body",
            "status",
            "created_at",
            "updated_at",
            "deleted_at",
        ]
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
            "author_id" => Some(Value::Uuid(self.author_id)),
            "title" => Some(Value::Text(self.title.clone())),
            "body" => Some(Value::Text(self.body.clone())),
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
            ("author_id", Value::Uuid(self.author_id)),
            ("title", Value::Text(self.title.clone())),
            ("body", Value::Text(self.body.clone())),
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

pub const POST_POLICY: EntityPolicy = EntityPolicy {
    filterable: &[
        FilterableField {
            column: "status",
            kind: FieldKind::Keyword,
            matching: Matching::SetMember,
        },
        FilterableField {
            column: "author_id",
            kind: FieldKind::Uuid,
            matching: Matching::Exact,
        },
        FilterableField {
            column: "title",
            kind: FieldKind::Text,
            matching: Matching::Substring,
        },
    ],
    sortable: &["created_at", "title"],
    default_sort: Sort {
        column: "created_at",
        direction: SortDirection::Desc,
    },
    access: AccessRule {
        owner_column: Some("author_id"),
        public: Some(("status", "published")),
    },
};
