//! Predicate construction and evaluation
//!
//! One predicate per active criterion of a query, plus one for an active
//! free-text search. Predicates are pure and closed over the query; a record
//! lacking the referenced field fails the predicate.

use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::query::{Criterion, Query};
use crate::record::{parse_instant, FieldValue, Record};
use crate::view::{FieldKind, ViewConfig};

/// A boolean test over one record
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// Normalized field value is in the key set
    OneOf {
        field: String,
        kind: FieldKind,
        keys: BTreeSet<String>,
    },
    /// Numeric field within an inclusive range
    NumberRange {
        field: String,
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Timestamp field within an inclusive range of instants
    DateRange {
        field: String,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    },
    /// Any searchable field contains the search text
    Search {
        fields: Vec<(String, FieldKind)>,
        needle: String,
        digits: Option<String>,
    },
}

impl Predicate {
    /// Builds the predicate for one criterion, or `None` if it is inactive
    pub fn from_criterion(field: &str, criterion: &Criterion, kind: FieldKind) -> Option<Self> {
        if !criterion.is_active() {
            return None;
        }

        let predicate = match criterion {
            Criterion::OneOf { values } => Predicate::OneOf {
                field: field.to_string(),
                kind,
                keys: values.iter().filter_map(|v| json_key(v, kind)).collect(),
            },
            Criterion::NumberRange { min, max } => Predicate::NumberRange {
                field: field.to_string(),
                min: *min,
                max: *max,
            },
            Criterion::DateRange { from, to } => Predicate::DateRange {
                field: field.to_string(),
                from: *from,
                to: *to,
            },
        };

        Some(predicate)
    }

    /// Builds the free-text predicate for trimmed, non-blank search text.
    ///
    /// Blank searches never reach here; see [`Query::active_search`].
    pub fn search(text: &str, view: &ViewConfig) -> Self {
        let digits = normalize_phone(text);
        let digits = digits.chars().any(|c| c.is_ascii_digit()).then_some(digits);

        Predicate::Search {
            fields: view
                .searchable_fields()
                .map(|(name, kind)| (name.to_string(), kind))
                .collect(),
            needle: text.to_lowercase(),
            digits,
        }
    }

    /// Checks if a record satisfies this predicate
    pub fn matches<R: Record + ?Sized>(&self, record: &R) -> bool {
        match self {
            Predicate::OneOf { field, kind, keys } => {
                field_key(record.field(field), *kind).is_some_and(|key| keys.contains(&key))
            }
            Predicate::NumberRange { field, min, max } => match record.field(field) {
                FieldValue::Number(n) => {
                    min.map_or(true, |lo| n >= lo) && max.map_or(true, |hi| n <= hi)
                }
                _ => false,
            },
            Predicate::DateRange { field, from, to } => {
                match record.field(field).as_text().and_then(parse_instant) {
                    Some(at) => from.map_or(true, |lo| at >= lo) && to.map_or(true, |hi| at <= hi),
                    None => false,
                }
            }
            Predicate::Search {
                fields,
                needle,
                digits,
            } => fields.iter().any(|(field, kind)| {
                let Some(text) = record.field(field).as_text() else {
                    return false;
                };
                if text.to_lowercase().contains(needle.as_str()) {
                    return true;
                }
                match (kind, digits) {
                    (FieldKind::Phone, Some(digits)) => normalize_phone(text).contains(digits.as_str()),
                    _ => false,
                }
            }),
        }
    }

    /// Returns the filtered field, if the predicate targets exactly one
    pub fn field(&self) -> Option<&str> {
        match self {
            Predicate::OneOf { field, .. }
            | Predicate::NumberRange { field, .. }
            | Predicate::DateRange { field, .. } => Some(field),
            Predicate::Search { .. } => None,
        }
    }
}

/// Builds all predicates for a query in evaluation order.
///
/// Field criteria come first in field-name order, then the search.
pub fn build_predicates(query: &Query, view: &ViewConfig) -> Vec<Predicate> {
    let mut predicates: Vec<Predicate> = query
        .filters
        .iter()
        .filter_map(|(field, criterion)| {
            Predicate::from_criterion(field, criterion, view.field_kind(field))
        })
        .collect();

    if let Some(search) = query.active_search() {
        predicates.push(Predicate::search(search, view));
    }

    predicates
}

/// Normalizes a string for set comparison
pub fn normalize(value: &str, kind: FieldKind) -> String {
    match kind {
        FieldKind::Phone => normalize_phone(value),
        _ => value.trim().to_lowercase(),
    }
}

/// Keeps only ASCII digits and `+`
pub fn normalize_phone(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_digit() || *c == '+')
        .collect()
}

fn field_key(value: FieldValue<'_>, kind: FieldKind) -> Option<String> {
    match value {
        FieldValue::Null => None,
        FieldValue::Bool(b) => Some(b.to_string()),
        FieldValue::Number(n) => Some(number_key(n)),
        FieldValue::Text(s) => Some(normalize(s, kind)),
    }
}

fn json_key(value: &Value, kind: FieldKind) -> Option<String> {
    match value {
        Value::String(s) => Some(normalize(s, kind)),
        Value::Number(n) => n.as_f64().map(number_key),
        Value::Bool(b) => Some(b.to_string()),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// Integral numbers render without a fraction so `42` and `42.0` agree
fn number_key(n: f64) -> String {
    if n.fract() == 0.0 && n.abs() < 1e15 {
        format!("{}", n as i64)
    } else {
        n.to_string()
    }
}
