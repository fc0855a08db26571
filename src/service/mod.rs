// Generic service: business policy layered over the repository.
//
// Each domain module supplies a static `EntityPolicy` describing its
// filterable and sortable fields and its access rule; the service validates
// and normalizes caller input against that descriptor, applies authorization
// scope before every repository call, and owns unique short-code generation.

use std::sync::Arc;

use rand::Rng;
use uuid::Uuid;

use crate::core::auth::AuthContext;
use crate::core::error::{AppError, Result};
use crate::core::pagination::{PageRequest, PaginationResult};
use crate::core::query::{
    Filter, FilterCriteria, Predicate, ScopeClause, Sort, SortSpec, Value,
};
use crate::repository::Repository;
use crate::store::{DataStore, Entity};

/// Unambiguous alphabet for human-readable codes (no 0/O/1/I/L).
pub const CODE_ALPHABET: &[u8] = b"ABCDEFGHJKMNPQRSTUVWXYZ23456789";

/// Attempts before unique-code generation gives up with
/// `GenerationExhausted`.
pub const CODE_RETRY_BUDGET: usize = 5;

/// Value typing for a filterable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// Free text, matched as given
    Text,
    /// Case-folded enumeration value (role, status)
    Keyword,
    /// UUID reference
    Uuid,
}

/// Which predicate a filterable column accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Matching {
    Exact,
    Substring,
    SetMember,
}

#[derive(Debug, Clone, Copy)]
pub struct FilterableField {
    pub column: &'static str,
    pub kind: FieldKind,
    pub matching: Matching,
}

/// Owner/visibility rule for non-privileged callers.
#[derive(Debug, Clone, Copy)]
pub struct AccessRule {
    /// Column holding the owning user's id; `None` disables scoping.
    pub owner_column: Option<&'static str>,
    /// Column/value marking a record publicly readable.
    pub public: Option<(&'static str, &'static str)>,
}

/// Static schema descriptor a domain module hands to the generic service.
#[derive(Debug, Clone, Copy)]
pub struct EntityPolicy {
    pub filterable: &'static [FilterableField],
    pub sortable: &'static [&'static str],
    pub default_sort: Sort,
    pub access: AccessRule,
}

pub struct EntityService<T: Entity> {
    repo: Repository<T>,
    policy: &'static EntityPolicy,
}

impl<T: Entity> Clone for EntityService<T> {
    fn clone(&self) -> Self {
        Self {
            repo: self.repo.clone(),
            policy: self.policy,
        }
    }
}

impl<T: Entity> EntityService<T> {
    pub fn new(store: Arc<dyn DataStore<T>>, policy: &'static EntityPolicy) -> Self {
        Self {
            repo: Repository::new(store),
            policy,
        }
    }

    pub fn repository(&self) -> &Repository<T> {
        &self.repo
    }

    /// Filtered, paginated listing under the caller's read scope.
    ///
    /// Soft-deleted rows are only reachable by privileged callers asking for
    /// them explicitly.
    pub async fn list(
        &self,
        caller: &AuthContext,
        criteria: &FilterCriteria,
        sort: Option<&SortSpec>,
        page: PageRequest,
        include_deleted: bool,
    ) -> Result<PaginationResult<T>> {
        if include_deleted && !caller.role.is_privileged() {
            return Err(AppError::unauthorized(
                "only administrators may include deleted records",
            ));
        }

        let filters = self.resolve_filters(criteria)?;
        let sort = self.resolve_sort(sort)?;

        self.repo
            .find_many(filters, self.read_scope(caller), sort, page, include_deleted)
            .await
    }

    pub async fn get(&self, caller: &AuthContext, id: Uuid) -> Result<T> {
        self.repo
            .find_by_id(id, self.read_scope(caller), false)
            .await
    }

    pub async fn create(&self, entity: T) -> Result<T> {
        self.repo.create(entity).await
    }

    pub async fn update(&self, caller: &AuthContext, id: Uuid, patch: &T::Patch) -> Result<T> {
        self.repo.update(id, patch, self.write_scope(caller)).await
    }

    pub async fn remove(&self, caller: &AuthContext, id: Uuid) -> Result<()> {
        self.repo.delete(id, self.write_scope(caller)).await
    }

    /// Allocate a short human-readable code unique within `column`.
    pub async fn generate_unique_code(&self, column: &'static str, length: usize) -> Result<String> {
        self.generate_unique_code_with(column, length, sample_code)
            .await
    }

    /// Generation with an injectable sampler, used by tests to force
    /// collisions. Retries are bounded: persistent collisions end in
    /// `GenerationExhausted` rather than an unbounded loop.
    pub async fn generate_unique_code_with(
        &self,
        column: &'static str,
        length: usize,
        sample: impl Fn(usize) -> String,
    ) -> Result<String> {
        for _ in 0..CODE_RETRY_BUDGET {
            let candidate = sample(length);
            let taken = self
                .repo
                .exists(vec![Filter::Eq(column, Value::Text(candidate.clone()))])
                .await?;
            if !taken {
                return Ok(candidate);
            }
            tracing::debug!(column, "generated code collided, retrying");
        }

        Err(AppError::GenerationExhausted(format!(
            "could not allocate a unique `{}` after {} attempts",
            column, CODE_RETRY_BUDGET
        )))
    }

    /// Read scope: admins see everything, everyone else sees own records plus
    /// the entity's public subset. Applied before the repository call, so no
    /// out-of-scope row is ever materialized and discarded.
    fn read_scope(&self, caller: &AuthContext) -> Option<ScopeClause> {
        if caller.role.is_privileged() {
            return None;
        }
        let owner_column = self.policy.access.owner_column?;
        Some(ScopeClause {
            owner_column,
            owner_id: caller.id,
            public: self
                .policy
                .access
                .public
                .map(|(column, value)| (column, Value::Text(value.to_string()))),
        })
    }

    /// Write scope: owner only. Public visibility never grants mutation.
    fn write_scope(&self, caller: &AuthContext) -> Option<ScopeClause> {
        if caller.role.is_privileged() {
            return None;
        }
        let owner_column = self.policy.access.owner_column?;
        Some(ScopeClause {
            owner_column,
            owner_id: caller.id,
            public: None,
        })
    }

    /// Resolve boundary criteria against the policy: unknown fields and
    /// mismatched predicates are validation errors, values are trimmed,
    /// keywords case-folded, and UUID references parsed.
    fn resolve_filters(&self, criteria: &FilterCriteria) -> Result<Vec<Filter>> {
        let mut filters = Vec::new();

        for (field, predicate) in criteria.entries() {
            let spec = self
                .policy
                .filterable
                .iter()
                .find(|candidate| candidate.column == field.as_str())
                .ok_or_else(|| AppError::validation(format!("cannot filter by `{}`", field)))?;

            match (spec.matching, predicate) {
                (Matching::Substring, Predicate::Search(term)) => {
                    let term = term.trim();
                    if !term.is_empty() {
                        filters.push(Filter::Contains(spec.column, term.to_lowercase()));
                    }
                }
                (Matching::Exact, Predicate::Equals(raw)) => {
                    filters.push(Filter::Eq(spec.column, parse_value(spec, raw)?));
                }
                (Matching::SetMember, Predicate::OneOf(raws)) => {
                    let values = raws
                        .iter()
                        .map(|raw| parse_value(spec, raw))
                        .collect::<Result<Vec<_>>>()?;
                    filters.push(Filter::AnyOf(spec.column, values));
                }
                _ => {
                    return Err(AppError::validation(format!(
                        "unsupported predicate for `{}`",
                        field
                    )))
                }
            }
        }

        Ok(filters)
    }

    fn resolve_sort(&self, spec: Option<&SortSpec>) -> Result<Sort> {
        match spec {
            None => Ok(self.policy.default_sort),
            Some(spec) => {
                let column = self
                    .policy
                    .sortable
                    .iter()
                    .find(|candidate| **candidate == spec.field.as_str())
                    .copied()
                    .ok_or_else(|| {
                        AppError::validation(format!("cannot sort by `{}`", spec.field))
                    })?;
                Ok(Sort {
                    column,
                    direction: spec.direction,
                })
            }
        }
    }
}

fn parse_value(spec: &FilterableField, raw: &str) -> Result<Value> {
    let raw = raw.trim();
    match spec.kind {
        FieldKind::Text => Ok(Value::Text(raw.to_string())),
        FieldKind::Keyword => Ok(Value::Text(raw.to_lowercase())),
        FieldKind::Uuid => raw
            .parse::<Uuid>()
            .map(Value::Uuid)
            .map_err(|_| AppError::validation(format!("`{}` expects a UUID", spec.column))),
    }
}

fn sample_code(length: usize) -> String {
    let mut rng = rand::thread_rng();
    (0..length)
        .map(|_| {
            let index = rng.gen_range(0..CODE_ALPHABET.len());
            CODE_ALPHABET[index] as char
        })
        .collect()
}
