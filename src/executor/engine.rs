//! Record query engine
//!
//! Runs a query over an in-memory record collection.
//!
//! Execution flow (strict order):
//! 1. Validate the query against the view
//! 2. Build predicates for every active criterion and the search
//! 3. Filter records (AND semantics)
//! 4. Apply sort (if specified)
//! 5. Slice the requested page
//!
//! Same records + same query = same page. The source slice is never mutated.

use crate::observability::Logger;
use crate::query::{Query, QueryResult};
use crate::record::Record;
use crate::view::ViewConfig;

use super::filters::PredicateFilter;
use super::pager::Pager;
use super::predicates::build_predicates;
use super::result::Page;
use super::sorter::ResultSorter;

/// Query engine configured for one view
#[derive(Debug, Clone)]
pub struct RecordQueryEngine {
    view: ViewConfig,
}

impl RecordQueryEngine {
    /// Creates an engine for a view
    pub fn new(view: ViewConfig) -> Self {
        Self { view }
    }

    /// Returns the view configuration
    pub fn view(&self) -> &ViewConfig {
        &self.view
    }

    /// Executes a query and returns the requested page.
    ///
    /// Fails only on an invalid query; records never cause an error.
    pub fn execute<'a, R: Record>(&self, records: &'a [R], query: &Query) -> QueryResult<Page<&'a R>> {
        query.validate(&self.view)?;

        let predicates = build_predicates(query, &self.view);
        let filtered = PredicateFilter::apply(records, &predicates);

        let ordered = match &query.sort {
            Some(spec) => ResultSorter::sort(&filtered, spec, self.view.field_kind(&spec.field)),
            None => filtered,
        };

        let page = Pager::paginate(&ordered, query.page, query.page_size);

        let scanned = records.len().to_string();
        let predicate_count = predicates.len().to_string();
        let matched = page.total.to_string();
        let returned = page.len().to_string();
        let sort = query.sort.as_ref().map(ToString::to_string).unwrap_or_default();
        Logger::trace(
            "QUERY_EXECUTED",
            &[
                ("view", self.view.name.as_str()),
                ("scanned", scanned.as_str()),
                ("predicates", predicate_count.as_str()),
                ("matched", matched.as_str()),
                ("returned", returned.as_str()),
                ("sort", sort.as_str()),
            ],
        );

        Ok(page)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::{Criterion, QueryError, SortSpec};
    use crate::view::FieldSpec;
    use serde_json::{json, Value};

    fn engine() -> RecordQueryEngine {
        RecordQueryEngine::new(
            ViewConfig::new("people", "people.prefs.v1")
                .with_field("name", FieldSpec::text().searchable().sortable())
                .with_field("age", FieldSpec::number().sortable())
                .with_field("active", FieldSpec::boolean()),
        )
    }

    fn people() -> Vec<Value> {
        vec![
            json!({"name": "Bob", "age": 30}),
            json!({"name": "Amy", "age": 30}),
            json!({"name": "Cid", "age": 25}),
        ]
    }

    fn names(page: &Page<&Value>) -> Vec<String> {
        page.iter().map(|r| r["name"].as_str().unwrap().to_string()).collect()
    }

    #[test]
    fn test_filter_sort_page() {
        let records = people();
        let query = Query::new()
            .with_filter("age", Criterion::at_least(28.0))
            .with_sort(SortSpec::asc("name"))
            .with_page_size(1);

        let page = engine().execute(&records, &query).unwrap();
        assert_eq!(names(&page), vec!["Amy"]);
        assert_eq!(page.total, 2);
        assert_eq!(page.total_pages, 2);
    }

    #[test]
    fn test_no_sort_keeps_source_order() {
        let records = people();
        let page = engine().execute(&records, &Query::new()).unwrap();
        assert_eq!(names(&page), vec!["Bob", "Amy", "Cid"]);
    }

    #[test]
    fn test_rejects_invalid_query() {
        let records = people();

        let err = engine()
            .execute(&records, &Query::new().with_page_size(0))
            .unwrap_err();
        assert_eq!(err, QueryError::InvalidPageSize);

        let err = engine()
            .execute(&records, &Query::new().with_sort(SortSpec::asc("active")))
            .unwrap_err();
        assert_eq!(err, QueryError::UnsortableField("active".to_string()));
    }

    #[test]
    fn test_idempotent() {
        let records = people();
        let query = Query::new().with_search("b").with_sort(SortSpec::desc("age"));

        let first = engine().execute(&records, &query).unwrap();
        let second = engine().execute(&records, &query).unwrap();
        assert_eq!(first, second);
    }
}
