//! Query model for the record query engine
//!
//! A query names a free-text search, per-field criteria (AND semantics), an
//! optional sort and a page window. Construction and validation are the only
//! places a query can fail.

mod ast;
mod errors;
mod parser;

pub use ast::{Criterion, Query, QueryPatch, SortDirection, SortSpec, DEFAULT_PAGE_SIZE};
pub use errors::{QueryError, QueryResult};
pub use parser::{parse_filter, parse_sort};

use crate::view::ViewConfig;

impl Query {
    /// Validates this query against a view.
    ///
    /// Checks `page_size > 0` and that the sort field is declared sortable.
    /// Filters on undeclared fields are allowed; records simply lack them.
    pub fn validate(&self, view: &ViewConfig) -> QueryResult<()> {
        if self.page_size == 0 {
            return Err(QueryError::InvalidPageSize);
        }

        if let Some(sort) = &self.sort {
            if !view.is_sortable(&sort.field) {
                return Err(QueryError::UnsortableField(sort.field.clone()));
            }
        }

        Ok(())
    }
}
