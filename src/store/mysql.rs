// MySQL adapter for the store seam.
//
// Statements are rendered at runtime from the entity descriptor and bound
// positionally, so builds do not need a live database. MySQL error codes are
// classified into `StoreError` here and nowhere else.

use std::marker::PhantomData;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::mysql::{MySqlPool, MySqlRow};
use sqlx::Row;
use uuid::Uuid;

use crate::core::query::{ScopeClause, SelectQuery, Value};
use crate::store::entity::{Entity, Patch};
use crate::store::sql::SqlRenderer;
use crate::store::{DataStore, StoreError, StoreResult};

/// Bind a rendered parameter list onto any sqlx query builder.
macro_rules! bind_values {
    ($query:expr, $params:expr) => {{
        let mut query = $query;
        for value in $params {
            query = match value {
                Value::Text(v) => query.bind(v),
                Value::Int(v) => query.bind(v),
                Value::Bool(v) => query.bind(v),
                Value::Uuid(v) => query.bind(v),
                Value::Timestamp(v) => query.bind(v),
                Value::Decimal(v) => query.bind(v),
            };
        }
        query
    }};
}

/// Generic MySQL-backed store for one entity type.
pub struct MySqlStore<T> {
    pool: MySqlPool,
    _marker: PhantomData<fn() -> T>,
}

impl<T> MySqlStore<T> {
    pub fn new(pool: MySqlPool) -> Self {
        Self {
            pool,
            _marker: PhantomData,
        }
    }

    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

impl<T> Clone for MySqlStore<T> {
    fn clone(&self) -> Self {
        Self {
            pool: self.pool.clone(),
            _marker: PhantomData,
        }
    }
}

#[async_trait]
impl<T> DataStore<T> for MySqlStore<T>
where
    T: Entity + for<'r> sqlx::FromRow<'r, MySqlRow>,
{
    async fn select(&self, query: &SelectQuery) -> StoreResult<Vec<T>> {
        let (sql, params) = SqlRenderer::for_entity::<T>().select(query);
        bind_values!(sqlx::query_as::<_, T>(&sql), params)
            .fetch_all(&self.pool)
            .await
            .map_err(map_sqlx_error)
    }

    async fn count(&self, query: &SelectQuery) -> StoreResult<u64> {
        let (sql, params) = SqlRenderer::for_entity::<T>().count(query);
        let row = bind_values!(sqlx::query(&sql), params)
            .fetch_one(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        let count: i64 = row.try_get(0).map_err(map_sqlx_error)?;
        Ok(count.max(0) as u64)
    }

    async fn insert(&self, entity: &T) -> StoreResult<()> {
        let (sql, params) = SqlRenderer::for_entity::<T>().insert(entity.insert_values());
        bind_values!(sqlx::query(&sql), params)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(())
    }

    async fn update(
        &self,
        id: Uuid,
        patch: &T::Patch,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64> {
        let (sql, params) =
            SqlRenderer::for_entity::<T>().update(id, patch.assignments(), at, scope);
        let result = bind_values!(sqlx::query(&sql), params)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn delete(&self, id: Uuid, scope: Option<&ScopeClause>) -> StoreResult<u64> {
        let (sql, params) = SqlRenderer::for_entity::<T>().delete(id, scope);
        let result = bind_values!(sqlx::query(&sql), params)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }

    async fn soft_delete(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> StoreResult<u64> {
        let (sql, params) = SqlRenderer::for_entity::<T>().soft_delete(id, at, scope);
        let result = bind_values!(sqlx::query(&sql), params)
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;
        Ok(result.rows_affected())
    }
}

/// Translate driver failures into the store taxonomy.
///
/// 1062 duplicate key and 1451/1452 foreign-key failures become constraint
/// reports; 1213 deadlock and 1205 lock-wait timeout are the store's
/// concurrent-modification signal.
fn map_sqlx_error(err: sqlx::Error) -> StoreError {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            return StoreError::UniqueViolation {
                column: unique_column_from_message(db_err.message()),
            };
        }
        if db_err.is_foreign_key_violation() {
            return StoreError::ForeignKeyViolation {
                constraint: db_err.message().to_string(),
            };
        }
        if matches!(db_err.code().as_deref(), Some("1213") | Some("1205")) {
            return StoreError::ConcurrentModification;
        }
    }
    StoreError::Backend(err.to_string())
}

/// Extract the violated key name from MySQL's duplicate-entry message,
/// e.g. `Duplicate entry 'a@b.c' for key 'users.email'` -> `email`.
fn unique_column_from_message(message: &str) -> String {
    message
        .rsplit_once("for key '")
        .and_then(|(_, tail)| tail.split('\'').next())
        .and_then(|key| key.rsplit('.').next())
        .map(str::to_string)
        .unwrap_or_else(|| "unique".to_string())
}
