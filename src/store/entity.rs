// Entity schema descriptor: table, columns, unique keys and soft-delete
// marker are declared explicitly per entity rather than probed at runtime.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::query::Value;

/// A persisted domain record with a stable identifier.
///
/// Implemented manually by each domain model; the descriptor methods drive
/// SQL rendering for the MySQL adapter and predicate evaluation for the
/// in-memory adapter, so both execute the same query semantics.
pub trait Entity: Clone + Send + Sync + Unpin + 'static {
    /// Partial-update payload for this entity.
    type Patch: Patch<Self>;

    fn table() -> &'static str;

    fn id_column() -> &'static str {
        "id"
    }

    /// Full column list, in select order.
    fn columns() -> &'static [&'static str];

    /// Columns carrying a unique index.
    fn unique_columns() -> &'static [&'static str] {
        &[]
    }

    /// Soft-delete marker column, if the entity declares one. Entities
    /// without a marker are hard-deleted.
    fn soft_delete_column() -> Option<&'static str> {
        None
    }

    fn id(&self) -> Uuid;

    /// Typed access to a column's current value; `None` represents SQL NULL.
    fn field(&self, column: &str) -> Option<Value>;

    /// Column/value pairs for insertion. Columns whose value is NULL may be
    /// omitted.
    fn insert_values(&self) -> Vec<(&'static str, Value)>;

    /// Bump the `updated_at` timestamp.
    fn touch(&mut self, at: DateTime<Utc>);

    /// Set the soft-delete marker. No-op for hard-deleted entities.
    fn mark_deleted(&mut self, _at: DateTime<Utc>) {}
}

/// A partial update applicable both as SQL assignments and directly to an
/// in-memory row.
pub trait Patch<T>: Send + Sync {
    /// Column/value pairs for the fields actually present in the patch.
    fn assignments(&self) -> Vec<(&'static str, Value)>;

    /// Apply the same fields to an owned entity.
    fn apply(&self, entity: &mut T);
}
