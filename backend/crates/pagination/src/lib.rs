//! Page-request validation and the page envelope shared by backend endpoints.
//!
//! Endpoints that return collections accept a [`PageRequest`] (1-based page
//! number plus page size) and answer with a [`Page`] envelope carrying the
//! items for the requested window together with the pagination metadata
//! clients need to walk the collection.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Smallest accepted page number (pages are 1-based).
pub const MIN_PAGE: u32 = 1;
/// Smallest accepted page size.
pub const MIN_LIMIT: u32 = 1;
/// Largest accepted page size.
pub const MAX_LIMIT: u32 = 100;

/// Validation errors raised by [`PageRequest::new`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageRequestError {
    /// Page number below [`MIN_PAGE`].
    #[error("page must be at least {MIN_PAGE}")]
    PageTooSmall,
    /// Page size below [`MIN_LIMIT`].
    #[error("limit must be at least {MIN_LIMIT}")]
    LimitTooSmall,
    /// Page size above [`MAX_LIMIT`].
    #[error("limit must be at most {MAX_LIMIT}")]
    LimitTooLarge,
}

/// Validated request for one page of a collection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: u32,
    limit: u32,
}

impl PageRequest {
    /// Validate and construct a page request.
    pub fn new(page: u32, limit: u32) -> Result<Self, PageRequestError> {
        if page < MIN_PAGE {
            return Err(PageRequestError::PageTooSmall);
        }
        if limit < MIN_LIMIT {
            return Err(PageRequestError::LimitTooSmall);
        }
        if limit > MAX_LIMIT {
            return Err(PageRequestError::LimitTooLarge);
        }
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    pub fn page(&self) -> u32 {
        self.page
    }

    /// Number of items per page.
    pub fn limit(&self) -> u32 {
        self.limit
    }

    /// Number of rows to skip before the requested window.
    pub fn offset(&self) -> u64 {
        u64::from(self.page - 1) * u64::from(self.limit)
    }
}

impl Default for PageRequest {
    /// First page with ten items, the conventional listing default.
    fn default() -> Self {
        Self { page: 1, limit: 10 }
    }
}

/// One page of a collection plus the metadata needed to request the rest.
///
/// Serialises as `{items, total, page, limit, pages}` where `pages` is the
/// total page count derived from `total` and `limit`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Page<T> {
    /// Items inside the requested window.
    pub items: Vec<T>,
    /// Total matching items, ignoring the window.
    pub total: u64,
    /// 1-based page number this envelope answers.
    pub page: u32,
    /// Window size used for the query.
    pub limit: u32,
    /// Total number of pages for `total` items at `limit` per page.
    pub pages: u64,
}

impl<T> Page<T> {
    /// Build a page envelope, deriving the page count from the total.
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page(),
            limit: request.limit(),
            pages: total.div_ceil(u64::from(request.limit())),
        }
    }

    /// Map the item type while keeping the pagination metadata.
    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            total: self.total,
            page: self.page,
            limit: self.limit,
            pages: self.pages,
        }
    }
}
