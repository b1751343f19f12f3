//! Result types for query execution

use serde::Serialize;

/// One page of query results
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Page<T> {
    /// Rows in result order
    pub rows: Vec<T>,
    /// Matching rows before paging
    pub total: usize,
    /// Page count at this page size, at least 1
    pub total_pages: usize,
    /// Requested zero-based page index
    pub page: usize,
    /// Rows per page
    pub page_size: usize,
}

impl<T> Page<T> {
    /// Returns true if this page has no rows
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Returns the number of rows on this page
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns an iterator over the rows
    pub fn iter(&self) -> impl Iterator<Item = &T> {
        self.rows.iter()
    }

    /// Returns true if a later page holds rows
    pub fn has_next(&self) -> bool {
        self.page + 1 < self.total_pages
    }

    /// Returns true if an earlier page exists
    pub fn has_previous(&self) -> bool {
        self.page > 0
    }

    /// Maps every row, keeping the paging metadata
    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            rows: self.rows.into_iter().map(f).collect(),
            total: self.total,
            total_pages: self.total_pages,
            page: self.page,
            page_size: self.page_size,
        }
    }
}
