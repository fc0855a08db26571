// Filter, sort and scope primitives the generic repository executes.
//
// Filters compose conjunctively; the only disjunction in the model is the
// owner-or-public scope clause, which the store renders as a single
// parenthesized OR group.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::core::error::{AppError, Result};

/// Typed bind value passed through to the store adapter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Text(String),
    Int(i64),
    Bool(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Decimal(Decimal),
}

/// A single resolved field predicate. Column names come from the entity's
/// policy descriptor, never from raw client input.
#[derive(Debug, Clone, PartialEq)]
pub enum Filter {
    /// Exact equality
    Eq(&'static str, Value),
    /// Case-insensitive substring match; the needle is stored lowercased
    Contains(&'static str, String),
    /// Set membership; an empty set matches nothing
    AnyOf(&'static str, Vec<Value>),
}

/// Caller-supplied filter criteria, produced at the validation boundary.
///
/// Field names are resolved against the entity policy before any store call;
/// unknown fields are a `Validation` error, absent fields impose no
/// constraint.
#[derive(Debug, Clone, Default)]
pub struct FilterCriteria {
    entries: Vec<(String, Predicate)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    Equals(String),
    Search(String),
    OneOf(Vec<String>),
}

impl Predicate {
    /// Parse a comma-separated query value into a set-membership predicate.
    pub fn one_of_csv(raw: &str) -> Self {
        Predicate::OneOf(
            raw.split(',')
                .map(|part| part.trim().to_string())
                .filter(|part| !part.is_empty())
                .collect(),
        )
    }
}

impl FilterCriteria {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: impl Into<String>, predicate: Predicate) {
        self.entries.push((field.into(), predicate));
    }

    pub fn with(mut self, field: impl Into<String>, predicate: Predicate) -> Self {
        self.push(field, predicate);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn entries(&self) -> &[(String, Predicate)] {
        &self.entries
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Asc,
    Desc,
}

/// Resolved sort over a policy-approved column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Sort {
    pub column: &'static str,
    pub direction: SortDirection,
}

/// Caller-requested sort, validated against the policy's sortable set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    /// Parse `field`, `field:asc` or `field:desc`.
    pub fn parse(raw: &str) -> Result<Self> {
        let raw = raw.trim();
        let (field, direction) = match raw.split_once(':') {
            None => (raw, SortDirection::Asc),
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some((_, other)) => {
                return Err(AppError::validation(format!(
                    "sort direction must be `asc` or `desc`, got `{}`",
                    other
                )))
            }
        };

        if field.is_empty() {
            return Err(AppError::validation("sort field cannot be empty"));
        }

        Ok(Self {
            field: field.to_string(),
            direction,
        })
    }
}

/// Authorization scope: restrict visibility to rows owned by the caller or,
/// for reads, rows carrying the entity's public marker.
#[derive(Debug, Clone, PartialEq)]
pub struct ScopeClause {
    pub owner_column: &'static str,
    pub owner_id: Uuid,
    pub public: Option<(&'static str, Value)>,
}

/// The store-facing read shape: conjunctive filters, optional scope, sort and
/// paging window.
#[derive(Debug, Clone, Default)]
pub struct SelectQuery {
    pub filters: Vec<Filter>,
    pub scope: Option<ScopeClause>,
    pub sort: Option<Sort>,
    pub limit: Option<u64>,
    pub offset: Option<u64>,
    pub include_deleted: bool,
}
