//! Query error types
//!
//! Raised only when a query is built or validated. Pipeline stages never fail
//! on data; they degrade to fewer rows or a later sort position.

use thiserror::Error;

/// Result type for query construction and validation
pub type QueryResult<T> = Result<T, QueryError>;

/// Query errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum QueryError {
    /// Page size of zero
    #[error("page_size must be greater than 0")]
    InvalidPageSize,

    /// Sort on a field the view does not declare sortable
    #[error("field '{0}' is not sortable")]
    UnsortableField(String),

    /// Malformed filter argument
    #[error("Invalid filter: {0}")]
    InvalidFilter(String),

    /// Malformed sort argument
    #[error("Invalid sort: {0}")]
    InvalidSort(String),

    /// Unparsable date bound
    #[error("Invalid date: {0}")]
    InvalidDate(String),
}

impl QueryError {
    /// Returns the stable error code
    pub fn code(&self) -> &'static str {
        match self {
            QueryError::InvalidPageSize => "CALLBOARD_INVALID_PAGE_SIZE",
            QueryError::UnsortableField(_) => "CALLBOARD_UNSORTABLE_FIELD",
            QueryError::InvalidFilter(_) => "CALLBOARD_INVALID_FILTER",
            QueryError::InvalidSort(_) => "CALLBOARD_INVALID_SORT",
            QueryError::InvalidDate(_) => "CALLBOARD_INVALID_DATE",
        }
    }
}
