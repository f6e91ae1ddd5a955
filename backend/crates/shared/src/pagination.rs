//! Pagination
//!
//! `?page=&limit=` parameters shared by every list endpoint and the
//! metadata block returned next to the items.

use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::error::app_error::AppResult;

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 20;
pub const MAX_LIMIT: i64 = 100;

fn default_page() -> i64 {
    DEFAULT_PAGE
}

fn default_limit() -> i64 {
    DEFAULT_LIMIT
}

/// Page request as received on the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Validate)]
pub struct PageQuery {
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be a positive integer"))]
    pub page: i64,
    #[serde(default = "default_limit")]
    #[validate(range(min = 1, max = 100, message = "Limit must be between 1 and 100"))]
    pub limit: i64,
}

impl Default for PageQuery {
    fn default() -> Self {
        Self {
            page: DEFAULT_PAGE,
            limit: DEFAULT_LIMIT,
        }
    }
}

impl PageQuery {
    pub fn new(page: i64, limit: i64) -> AppResult<Self> {
        let query = Self { page, limit };
        crate::validation::validate(&query)?;
        Ok(query)
    }

    /// Rows to skip; saturates for pages far past the end
    pub fn offset(&self) -> i64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

/// Metadata block of a list response
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Pagination {
    pub page: i64,
    pub limit: i64,
    pub total: i64,
    pub pages: i64,
}

impl Pagination {
    pub fn new(query: PageQuery, total: i64) -> Self {
        let pages = if total <= 0 {
            0
        } else {
            (total + query.limit - 1) / query.limit
        };
        Self {
            page: query.page,
            limit: query.limit,
            total,
            pages,
        }
    }
}

/// One page of items plus its metadata
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, query: PageQuery, total: i64) -> Self {
        Self {
            items,
            pagination: Pagination::new(query, total),
        }
    }

    pub fn map<U>(self, f: impl FnMut(T) -> U) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::kind::ErrorKind;

    #[test]
    fn test_defaults() {
        let q: PageQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q, PageQuery::default());
        assert_eq!(q.offset(), 0);
    }

    #[test]
    fn test_last_partial_page() {
        let q = PageQuery::new(3, 20).unwrap();
        assert_eq!(q.offset(), 40);

        let page = Page::new(vec![(); 5], q, 45);
        assert_eq!(page.items.len(), 5);
        assert_eq!(
            page.pagination,
            Pagination {
                page: 3,
                limit: 20,
                total: 45,
                pages: 3
            }
        );
    }

    #[test]
    fn test_offset_saturates_on_huge_page() {
        let q = PageQuery::new(i64::MAX, MAX_LIMIT).unwrap();
        assert_eq!(q.offset(), i64::MAX);
        assert_eq!(Pagination::new(q, 3).pages, 1);
    }

    #[test]
    fn test_empty_total_has_no_pages() {
        assert_eq!(Pagination::new(PageQuery::default(), 0).pages, 0);
    }

    #[test]
    fn test_out_of_range_is_rejected() {
        assert_eq!(PageQuery::new(0, 20).unwrap_err().kind(), ErrorKind::ValidationFailed);
        assert_eq!(PageQuery::new(1, 0).unwrap_err().kind(), ErrorKind::ValidationFailed);
        let err = PageQuery::new(1, 101).unwrap_err();
        assert_eq!(err.field_errors()[0].field, "limit");
    }
}
