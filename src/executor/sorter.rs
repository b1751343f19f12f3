//! Result sorting
//!
//! Orders records by one field. Missing, null and unsortable values always
//! rank last, in both directions; the direction flips only the comparison of
//! present values. The sort is stable, so equal keys keep their input order.

use std::cmp::Ordering;

use chrono::{DateTime, Utc};

use crate::query::{SortDirection, SortSpec};
use crate::record::{parse_instant, FieldValue, Record};
use crate::view::FieldKind;

/// Extracted sort key of one record
#[derive(Debug, Clone, Copy, PartialEq)]
enum SortKey<'a> {
    Number(f64),
    Instant(DateTime<Utc>),
    Text(&'a str),
    Missing,
}

impl<'a> SortKey<'a> {
    fn extract(value: FieldValue<'a>, kind: FieldKind) -> Self {
        match (kind, value) {
            (FieldKind::Timestamp, FieldValue::Text(s)) => {
                parse_instant(s).map(SortKey::Instant).unwrap_or(SortKey::Missing)
            }
            (FieldKind::Timestamp, _) => SortKey::Missing,
            (_, FieldValue::Number(n)) => SortKey::Number(n),
            (_, FieldValue::Text(s)) => SortKey::Text(s),
            (_, FieldValue::Bool(_)) | (_, FieldValue::Null) => SortKey::Missing,
        }
    }

    // Mixed present types order as number < instant < text
    fn type_rank(&self) -> u8 {
        match self {
            SortKey::Number(_) => 0,
            SortKey::Instant(_) => 1,
            SortKey::Text(_) => 2,
            SortKey::Missing => 3,
        }
    }
}

/// Sorts record collections
pub struct ResultSorter;

impl ResultSorter {
    /// Returns the records ordered by the sort specification.
    ///
    /// Keys are extracted once per record before sorting.
    pub fn sort<'a, R: Record>(records: &[&'a R], spec: &SortSpec, kind: FieldKind) -> Vec<&'a R> {
        let mut keyed: Vec<(SortKey<'a>, &'a R)> = records
            .iter()
            .map(|&record| (SortKey::extract(record.field(&spec.field), kind), record))
            .collect();

        // slice::sort_by is stable
        keyed.sort_by(|(a, _), (b, _)| Self::compare_keys(a, b, spec.direction));

        keyed.into_iter().map(|(_, record)| record).collect()
    }

    fn compare_keys(a: &SortKey<'_>, b: &SortKey<'_>, direction: SortDirection) -> Ordering {
        match (a, b) {
            (SortKey::Missing, SortKey::Missing) => Ordering::Equal,
            (SortKey::Missing, _) => Ordering::Greater,
            (_, SortKey::Missing) => Ordering::Less,
            _ => {
                let ordering = Self::compare_present(a, b);
                match direction {
                    SortDirection::Asc => ordering,
                    SortDirection::Desc => ordering.reverse(),
                }
            }
        }
    }

    fn compare_present(a: &SortKey<'_>, b: &SortKey<'_>) -> Ordering {
        match (a, b) {
            (SortKey::Number(x), SortKey::Number(y)) => x.partial_cmp(y).unwrap_or(Ordering::Equal),
            (SortKey::Instant(x), SortKey::Instant(y)) => x.cmp(y),
            (SortKey::Text(x), SortKey::Text(y)) => locale_cmp(x, y),
            _ => a.type_rank().cmp(&b.type_rank()),
        }
    }
}

/// Locale-style string ordering.
///
/// Letters compare case-insensitively first; among strings equal ignoring
/// case, lower case sorts before upper case, then code point order decides.
pub fn locale_cmp(a: &str, b: &str) -> Ordering {
    let folded = a
        .chars()
        .flat_map(char::to_lowercase)
        .cmp(b.chars().flat_map(char::to_lowercase));
    if folded != Ordering::Equal {
        return folded;
    }

    let case_rank = |c: char| u8::from(c.is_uppercase());
    a.chars()
        .map(case_rank)
        .cmp(b.chars().map(case_rank))
        .then_with(|| a.cmp(b))
}
