//! Predicate filtering
//!
//! A record passes only if every predicate matches (AND semantics). An empty
//! predicate set keeps every record.

use super::predicates::Predicate;
use crate::record::Record;

/// Applies predicate sets to records
pub struct PredicateFilter;

impl PredicateFilter {
    /// Checks if a record matches all predicates
    pub fn matches<R: Record + ?Sized>(record: &R, predicates: &[Predicate]) -> bool {
        predicates.iter().all(|pred| pred.matches(record))
    }

    /// Returns the matching records in source order.
    ///
    /// The source slice is only borrowed; the result is a new collection.
    pub fn apply<'a, R: Record>(records: &'a [R], predicates: &[Predicate]) -> Vec<&'a R> {
        records
            .iter()
            .filter(|record| Self::matches(*record, predicates))
            .collect()
    }
}
