// Page-based listing primitives shared by every domain module.
//
// Conventions (tested in tests/unit/pagination_test.rs):
// - limits outside [1, MAX_PAGE_SIZE] and page 0 are rejected, never clamped;
//   defaults apply only when a value is absent
// - total == 0 yields total_pages == 0 and has_next == has_prev == false
// - a page beyond the available range is served as an empty data slice with
//   the true total

use serde::Serialize;

use crate::core::error::{AppError, Result};

pub const DEFAULT_PAGE_SIZE: u32 = 20;
pub const MAX_PAGE_SIZE: u32 = 100;

/// Validated page/limit pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Build a request from optional, already-type-checked query values.
    ///
    /// `None` means the client omitted the field and the default applies.
    /// Present-but-out-of-range values are a `Validation` error.
    pub fn new(page: Option<u32>, limit: Option<u32>) -> Result<Self> {
        let page = match page {
            None => 1,
            Some(0) => return Err(AppError::validation("page must be at least 1")),
            Some(p) => p,
        };

        let limit = match limit {
            None => DEFAULT_PAGE_SIZE,
            Some(l) if l == 0 || l > MAX_PAGE_SIZE => {
                return Err(AppError::validation(format!(
                    "limit must be between 1 and {}",
                    MAX_PAGE_SIZE
                )))
            }
            Some(l) => l,
        };

        Ok(Self { page, limit })
    }

    pub fn page(&self) -> u32 {
        self.page
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Store-level skip: rows preceding the requested page.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }

    /// Store-level take: the page size.
    pub fn take(&self) -> u64 {
        u64::from(self.limit)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self {
            page: 1,
            limit: DEFAULT_PAGE_SIZE,
        }
    }
}

/// A page of results with pagination metadata.
///
/// `total` always reflects the full filtered set, independent of paging.
#[derive(Debug, Clone, Serialize)]
pub struct PaginationResult<T> {
    pub data: Vec<T>,
    pub total: u64,
    pub page: u32,
    pub limit: u32,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

impl<T> PaginationResult<T> {
    pub fn new(data: Vec<T>, total: u64, request: &PageRequest) -> Self {
        let page = request.page();
        let limit = request.limit();
        let total_pages = total_pages(total, limit);

        Self {
            data,
            total,
            page,
            limit,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1 && total > 0,
        }
    }
}

/// `ceil(total / limit)`; zero for an empty set.
pub fn total_pages(total: u64, limit: u32) -> u32 {
    if total == 0 {
        return 0;
    }
    ((total + u64::from(limit) - 1) / u64::from(limit)) as u32
}
