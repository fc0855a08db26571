// Generic repository: entity-agnostic CRUD and filtered, paginated listing
// over the store seam. Store failures are translated into the domain error
// taxonomy at this layer and nowhere above it.

use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{Filter, ScopeClause, SelectQuery, Sort, Value};
use crate::store::{DataStore, Entity, StoreError};

pub struct Repository<T: Entity> {
    store: Arc<dyn DataStore<T>>,
}

impl<T: Entity> Clone for Repository<T> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<T: Entity> Repository<T> {
    pub fn new(store: Arc<dyn DataStore<T>>) -> Self {
        Self { store }
    }

    /// Fetch a single entity by id within the given scope.
    ///
    /// Soft-deleted rows are invisible here unless `include_deleted` is set,
    /// the same rule `find_many` applies.
    pub async fn find_by_id(
        &self,
        id: Uuid,
        scope: Option<ScopeClause>,
        include_deleted: bool,
    ) -> Result<T> {
        let query = SelectQuery {
            filters: vec![Filter::Eq(T::id_column(), Value::Uuid(id))],
            scope,
            limit: Some(1),
            include_deleted,
            ..SelectQuery::default()
        };

        let mut rows = self.store.select(&query).await.map_err(translate)?;
        rows.pop()
            .ok_or_else(|| AppError::not_found(format!("{} {} not found", T::table(), id)))
    }

    /// Filtered, paginated listing.
    ///
    /// The count and the page fetch are two store round trips; without
    /// transaction isolation in the adapter the pair is not a consistent
    /// snapshot, so `total` can drift from `data` under concurrent writes.
    pub async fn find_many(
        &self,
        filters: Vec<Filter>,
        scope: Option<ScopeClause>,
        sort: Sort,
        page: PageRequest,
        include_deleted: bool,
    ) -> Result<PaginationResult<T>> {
        let base = SelectQuery {
            filters,
            scope,
            sort: Some(sort),
            include_deleted,
            ..SelectQuery::default()
        };

        let total = self.store.count(&base).await.map_err(translate)?;
        let query = SelectQuery {
            limit: Some(page.take()),
            offset: Some(page.offset()),
            ..base
        };
        let data = self.store.select(&query).await.map_err(translate)?;

        Ok(PaginationResult::new(data, total, &page))
    }

    /// True when any row (soft-deleted included) matches the filters.
    pub async fn exists(&self, filters: Vec<Filter>) -> Result<bool> {
        let query = SelectQuery {
            filters,
            include_deleted: true,
            ..SelectQuery::default()
        };
        let count = self.store.count(&query).await.map_err(translate)?;
        Ok(count > 0)
    }

    pub async fn create(&self, entity: T) -> Result<T> {
        self.store.insert(&entity).await.map_err(translate)?;
        Ok(entity)
    }

    /// Apply a partial update, then re-read the row.
    ///
    /// Zero affected rows means the id is absent, soft-deleted, or outside
    /// the caller's scope; all three surface as `NotFound`.
    pub async fn update(
        &self,
        id: Uuid,
        patch: &T::Patch,
        scope: Option<ScopeClause>,
    ) -> Result<T> {
        let affected = self
            .store
            .update(id, patch, Utc::now(), scope.as_ref())
            .await
            .map_err(translate)?;

        if affected == 0 {
            return Err(AppError::not_found(format!(
                "{} {} not found",
                T::table(),
                id
            )));
        }

        self.find_by_id(id, scope, false).await
    }

    /// Soft delete when the entity declares a marker column, hard delete
    /// otherwise.
    pub async fn delete(&self, id: Uuid, scope: Option<ScopeClause>) -> Result<()> {
        let affected = match T::soft_delete_column() {
            Some(_) => self.store.soft_delete(id, Utc::now(), scope.as_ref()).await,
            None => self.store.delete(id, scope.as_ref()).await,
        }
        .map_err(translate)?;

        if affected == 0 {
            return Err(AppError::not_found(format!(
                "{} {} not found",
                T::table(),
                id
            )));
        }

        Ok(())
    }
}

/// Map store failures onto the nearest domain error kind, keeping the
/// violated field as context where the store reports one.
fn translate(err: StoreError) -> AppError {
    match err {
        StoreError::UniqueViolation { column } => {
            AppError::constraint(format!("value for `{}` already exists", column))
        }
        StoreError::ForeignKeyViolation { constraint } => {
            AppError::constraint(format!("foreign key violation: {}", constraint))
        }
        StoreError::ConcurrentModification => {
            AppError::conflict("concurrent modification, retry the request")
        }
        StoreError::Backend(message) => AppError::internal(message),
    }
}
