// Persistent-store seam.
//
// The repository talks to `DataStore<T>` only; `MySqlStore` executes
// rendered SQL against the platform database and `MemoryStore` applies the
// same query semantics in-process for tests and local runs.

pub mod entity;
pub mod memory;
pub mod mysql;
pub mod sql;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::query::{ScopeClause, SelectQuery};
pub use entity::{Entity, Patch};
pub use memory::MemoryStore;
pub use mysql::MySqlStore;

pub type StoreResult<T> = std::result::Result<T, StoreError>;

/// Store-native failures, normalized before they cross the seam.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("unique value already exists for `{column}`")]
    UniqueViolation { column: String },

    #[error("related record missing for `{constraint}`")]
    ForeignKeyViolation { constraint: String },

    #[error("concurrent modification detected")]
    ConcurrentModification,

    #[error("store backend failure: {0}")]
    Backend(String),
}

/// Entity-agnostic query capability over the persistent store.
///
/// Write operations return the number of affected rows; zero rows is how the
/// repository learns that a target id was absent or out of scope.
#[async_trait]
pub trait DataStore<T: Entity>: Send + Sync {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<T>>;

    /// Count of rows satisfying the query, ignoring its paging window.
    async fn count(&self, query: &SelectQuery) -> StoreResult<u64>;

    async fn insert(&self, entity: &T) -> StoreResult<()>;

    async fn update(
        &self,
        id: Uuid,
        patch: &T::Patch,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64>;

    async fn delete(&self, id: Uuid, scope: Option<&ScopeClause>) -> StoreResult<u64>;

    async fn soft_delete(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64>;
}
