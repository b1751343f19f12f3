//! Record query pipeline
//!
//! Stages run in order over an in-memory collection, each a pure function
//! returning a new collection:
//!
//! 1. Predicates are built from the query's active criteria and search
//! 2. Filter keeps records matching every predicate
//! 3. Sort orders by one field, stable, nulls last
//! 4. Pager slices the requested window and reports totals
//!
//! # Invariants
//!
//! - Deterministic: same records + same query = same page
//! - The source collection is never mutated
//! - Data never raises errors; bad values fail predicates or sort last

mod engine;
mod filters;
mod pager;
mod predicates;
mod result;
mod sorter;

pub use engine::RecordQueryEngine;
pub use filters::PredicateFilter;
pub use pager::Pager;
pub use predicates::{build_predicates, normalize, normalize_phone, Predicate};
pub use result::Page;
pub use sorter::{locale_cmp, ResultSorter};
