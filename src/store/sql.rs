// Renders `SelectQuery` and write operations into MySQL statements with `?`
// placeholders. All identifiers come from static entity descriptors; only
// values travel as bind parameters.

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::core::query::{Filter, ScopeClause, SelectQuery, SortDirection, Value};
use crate::store::entity::Entity;

const UPDATED_AT: &str = "updated_at";

/// Statement renderer for one entity's table.
#[derive(Debug, Clone, Copy)]
pub struct SqlRenderer {
    table: &'static str,
    id_column: &'static str,
    columns: &'static [&'static str],
    soft_delete: Option<&'static str>,
}

impl SqlRenderer {
    pub fn for_entity<T: Entity>() -> Self {
        Self::new(
            T::table(),
            T::id_column(),
            T::columns(),
            T::soft_delete_column(),
        )
    }

    pub fn new(
        table: &'static str,
        id_column: &'static str,
        columns: &'static [&'static str],
        soft_delete: Option<&'static str>,
    ) -> Self {
        Self {
            table,
            id_column,
            columns,
            soft_delete,
        }
    }

    /// Build the paged SELECT returning `(sql, bind_values)`.
    pub fn select(&self, query: &SelectQuery) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT {} FROM {}", self.columns.join(", "), self.table);
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params, query);
        self.append_order(&mut sql, query);
        self.append_window(&mut sql, query);
        (sql, params)
    }

    /// Build the COUNT twin of [`select`](Self::select), ignoring the paging
    /// window.
    pub fn count(&self, query: &SelectQuery) -> (String, Vec<Value>) {
        let mut sql = format!("SELECT COUNT(*) FROM {}", self.table);
        let mut params = Vec::new();
        self.append_where(&mut sql, &mut params, query);
        (sql, params)
    }

    pub fn insert(&self, values: Vec<(&'static str, Value)>) -> (String, Vec<Value>) {
        let columns: Vec<&str> = values.iter().map(|(column, _)| *column).collect();
        let marks = vec!["?"; values.len()].join(", ");
        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({})",
            self.table,
            columns.join(", "),
            marks
        );
        let params = values.into_iter().map(|(_, value)| value).collect();
        (sql, params)
    }

    pub fn update(
        &self,
        id: Uuid,
        assignments: Vec<(&'static str, Value)>,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> (String, Vec<Value>) {
        let mut params = Vec::new();
        let mut sets: Vec<String> = assignments
            .iter()
            .map(|(column, _)| format!("{} = ?", column))
            .collect();
        params.extend(assignments.into_iter().map(|(_, value)| value));
        sets.push(format!("{} = ?", UPDATED_AT));
        params.push(Value::Timestamp(at));

        let mut sql = format!("UPDATE {} SET {}", self.table, sets.join(", "));
        self.append_target(&mut sql, &mut params, id, scope, true);
        (sql, params)
    }

    pub fn delete(&self, id: Uuid, scope: Option<&ScopeClause>) -> (String, Vec<Value>) {
        let mut sql = format!("DELETE FROM {}", self.table);
        let mut params = Vec::new();
        self.append_target(&mut sql, &mut params, id, scope, false);
        (sql, params)
    }

    /// Mark a row deleted instead of removing it. Already-marked rows are not
    /// matched again, so the caller sees zero affected rows.
    pub fn soft_delete(
        &self,
        id: Uuid,
        at: DateTime<Utc>,
        scope: Option<&ScopeClause>,
    ) -> (String, Vec<Value>) {
        let marker = self
            .soft_delete
            .expect("soft_delete rendered for entity without a marker column");

        let mut sql = format!(
            "UPDATE {} SET {} = ?, {} = ?",
            self.table, marker, UPDATED_AT
        );
        let mut params = vec![Value::Timestamp(at), Value::Timestamp(at)];
        self.append_target(&mut sql, &mut params, id, scope, true);
        (sql, params)
    }

    fn append_where(&self, sql: &mut String, params: &mut Vec<Value>, query: &SelectQuery) {
        let mut clauses = Vec::new();

        for filter in &query.filters {
            match filter {
                Filter::Eq(column, value) => {
                    clauses.push(format!("{} = ?", column));
                    params.push(value.clone());
                }
                Filter::Contains(column, needle) => {
                    clauses.push(format!("LOWER({}) LIKE ?", column));
                    params.push(Value::Text(format!(
                        "%{}%",
                        escape_like(&needle.to_lowercase())
                    )));
                }
                Filter::AnyOf(column, values) => {
                    if values.is_empty() {
                        clauses.push("1 = 0".to_string());
                    } else {
                        let marks = vec!["?"; values.len()].join(", ");
                        clauses.push(format!("{} IN ({})", column, marks));
                        params.extend(values.iter().cloned());
                    }
                }
            }
        }

        if let Some(scope) = &query.scope {
            clauses.push(self.scope_clause(scope, params));
        }

        if let Some(marker) = self.soft_delete {
            if !query.include_deleted {
                clauses.push(format!("{} IS NULL", marker));
            }
        }

        if !clauses.is_empty() {
            sql.push_str(" WHERE ");
            sql.push_str(&clauses.join(" AND "));
        }
    }

    fn scope_clause(&self, scope: &ScopeClause, params: &mut Vec<Value>) -> String {
        params.push(Value::Uuid(scope.owner_id));
        match &scope.public {
            Some((column, value)) => {
                params.push(value.clone());
                format!("({} = ? OR {} = ?)", scope.owner_column, column)
            }
            None => format!("{} = ?", scope.owner_column),
        }
    }

    /// WHERE clause shared by the write statements: primary key, optional
    /// scope, and (for updates) exclusion of soft-deleted rows.
    fn append_target(
        &self,
        sql: &mut String,
        params: &mut Vec<Value>,
        id: Uuid,
        scope: Option<&ScopeClause>,
        exclude_deleted: bool,
    ) {
        let mut clauses = vec![format!("{} = ?", self.id_column)];
        params.push(Value::Uuid(id));

        if let Some(scope) = scope {
            clauses.push(self.scope_clause(scope, params));
        }

        if exclude_deleted {
            if let Some(marker) = self.soft_delete {
                clauses.push(format!("{} IS NULL", marker));
            }
        }

        sql.push_str(" WHERE ");
        sql.push_str(&clauses.join(" AND "));
    }

    fn append_order(&self, sql: &mut String, query: &SelectQuery) {
        if let Some(sort) = query.sort {
            let direction = match sort.direction {
                SortDirection::Asc => "ASC",
                SortDirection::Desc => "DESC",
            };
            sql.push_str(&format!(" ORDER BY {} {}", sort.column, direction));
        }
    }

    fn append_window(&self, sql: &mut String, query: &SelectQuery) {
        if let Some(limit) = query.limit {
            sql.push_str(&format!(" LIMIT {}", limit));
        }
        if let Some(offset) = query.offset {
            sql.push_str(&format!(" OFFSET {}", offset));
        }
    }
}

/// Escape LIKE wildcards so user search terms match literally.
fn escape_like(needle: &str) -> String {
    needle
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
