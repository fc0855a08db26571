// In-memory adapter for the store seam.
//
// Applies the same query semantics as the SQL path (conjunctive filters,
// owner-or-public scope, soft-delete exclusion, unique columns) against an
// RwLock'd vector. Backs the test suites and store-less local runs.

use std::cmp::Ordering;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::core::query::{Filter, ScopeClause, SelectQuery, SortDirection, Value};
use crate::store::entity::{Entity, Patch};
use crate::store::{DataStore, StoreError, StoreResult};

pub struct MemoryStore<T: Entity> {
    rows: RwLock<Vec<T>>,
}

impl<T: Entity> MemoryStore<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }
}

impl<T: Entity> Default for MemoryStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<T: Entity> DataStore<T> for MemoryStore<T> {
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<T>> {
        let rows = self.rows.read().await;
        let mut matched: Vec<&T> = rows.iter().filter(|row| matches(*row, query)).collect();

        if let Some(sort) = query.sort {
            matched.sort_by(|a, b| {
                let ordering = compare(&a.field(sort.column), &b.field(sort.column));
                match sort.direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            });
        }

        let offset = query.offset.unwrap_or(0) as usize;
        let limit = query.limit.map(|l| l as usize).unwrap_or(usize::MAX);

        Ok(matched
            .into_iter()
            .skip(offset)
            .take(limit)
            .cloned()
            .collect())
    }

    async fn count(&self, query: &SelectQuery) -> StoreResult<u64> {
        let rows = self.rows.read().await;
        Ok(rows.iter().filter(|row| matches(*row, query)).count() as u64)
    }

    async fn insert(&self, entity: &T) -> StoreResult<()> {
        let mut rows = self.rows.write().await;
        // Unique indexes cover soft-deleted rows too.
        for column in T::unique_columns() {
            let candidate = entity.field(column);
            if candidate.is_some() && rows.iter().any(|row| row.field(column) == candidate) {
                return Err(StoreError::UniqueViolation {
                    column: (*column).to_string(),
                });
            }
        }
        rows.push(entity.clone());
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &T::Patch,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;

        let target = match position(&rows, id, scope, false) {
            Some(index) => index,
            None => return Ok(0),
        };

        for (column, value) in patch.assignments() {
            let is_unique = T::unique_columns().contains(&column);
            if is_unique
                && rows
                    .iter()
                    .any(|row| row.id() != id && row.field(column) == Some(value.clone()))
            {
                return Err(StoreError::UniqueViolation {
                    column: column.to_string(),
                });
            }
        }

        let row = &mut rows[target];
        patch.apply(row);
        row.touch(at);
        Ok(1)
    }

    async fn delete(&self, id: Uuid, scope: Option<&ScopeClause>) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        match position(&rows, id, scope, true) {
            Some(index) => {
                rows.remove(index);
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn soft_delete(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64> {
        let mut rows = self.rows.write().await;
        match position(&rows, id, scope, false) {
            Some(index) => {
                let row = &mut rows[index];
                row.mark_deleted(at);
                row.touch(at);
                Ok(1)
            }
            None => Ok(0),
        }
    }
}

/// Locate a live row by id within the given scope. `include_deleted` mirrors
/// the SQL target clause: hard deletes match marked rows, updates do not.
fn position<T: Entity>(
    rows: &[T],
    id: Uuid,
    scope: Option<&ScopeClause>,
    include_deleted: bool,
) -> Option<usize> {
    rows.iter().position(|row| {
        row.id() == id
            && scope.map_or(true, |scope| in_scope(row, scope))
            && (include_deleted || !is_deleted(row))
    })
}

fn matches<T: Entity>(row: &T, query: &SelectQuery) -> bool {
    if !query.include_deleted && is_deleted(row) {
        return false;
    }

    if let Some(scope) = &query.scope {
        if !in_scope(row, scope) {
            return false;
        }
    }

    query.filters.iter().all(|filter| match filter {
        Filter::Eq(column, value) => row.field(column).as_ref() == Some(value),
        Filter::Contains(column, needle) => match row.field(column) {
            Some(Value::Text(text)) => text.to_lowercase().contains(needle.as_str()),
            _ => false,
        },
        Filter::AnyOf(column, values) => row
            .field(column)
            .map_or(false, |value| values.contains(&value)),
    })
}

fn in_scope<T: Entity>(row: &T, scope: &ScopeClause) -> bool {
    if row.field(scope.owner_column) == Some(Value::Uuid(scope.owner_id)) {
        return true;
    }
    match &scope.public {
        Some((column, value)) => row.field(column).as_ref() == Some(value),
        None => false,
    }
}

fn is_deleted<T: Entity>(row: &T) -> bool {
    T::soft_delete_column().map_or(false, |column| row.field(column).is_some())
}

/// NULLs sort first, mirroring MySQL's ascending NULL ordering.
fn compare(a: &Option<Value>, b: &Option<Value>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (Some(left), Some(right)) => match (left, right) {
            (Value::Text(l), Value::Text(r)) => l.to_lowercase().cmp(&r.to_lowercase()),
            (Value::Int(l), Value::Int(r)) => l.cmp(r),
            (Value::Bool(l), Value::Bool(r)) => l.cmp(r),
            (Value::Uuid(l), Value::Uuid(r)) => l.cmp(r),
            (Value::Timestamp(l), Value::Timestamp(r)) => l.cmp(r),
            (Value::Decimal(l), Value::Decimal(r)) => l.cmp(r),
            _ => Ordering::Equal,
        },
    }
}
