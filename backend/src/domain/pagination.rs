//! Offset pagination for list endpoints.

use serde::Serialize;

/// Page size used when the caller omits or mangles `limit`.
pub const DEFAULT_PAGE_LIMIT: i64 = 25;
/// Exclusive upper bound for an accepted `limit`.
pub const MAX_PAGE_LIMIT: i64 = 1000;

/// Requested window over a list.
///
/// Out-of-range values fall back to the defaults instead of failing.
///
/// # Examples
/// ```
/// use food_api::domain::PageRequest;
///
/// let page = PageRequest::new(Some(3), Some(10));
/// assert_eq!(page.offset(), 20);
///
/// let fallback = PageRequest::new(Some(0), Some(5000));
/// assert_eq!((fallback.page(), fallback.limit()), (1, 25));
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: i64,
    limit: i64,
}

impl PageRequest {
    pub fn new(page: Option<i64>, limit: Option<i64>) -> Self {
        Self {
            page: page.filter(|page| *page > 0).unwrap_or(1),
            limit: limit
                .filter(|limit| *limit > 0 && *limit < MAX_PAGE_LIMIT)
                .unwrap_or(DEFAULT_PAGE_LIMIT),
        }
    }

    pub fn page(&self) -> i64 {
        self.page
    }

    pub fn limit(&self) -> i64 {
        self.limit
    }

    /// Rows to skip.
    pub fn offset(&self) -> i64 {
        self.limit.saturating_mul(self.page - 1)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(None, None)
    }
}

/// One page of results, echoing the effective window.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    pub list: Vec<T>,
    pub limit: i64,
    pub page: i64,
}

impl<T> Page<T> {
    pub fn new(list: Vec<T>, request: PageRequest) -> Self {
        Self {
            list,
            limit: request.limit(),
            page: request.page(),
        }
    }
}
