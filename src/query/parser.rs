//! Text parser for filter and sort arguments
//!
//! Filter syntax is `field=op:value`:
//! - `status=in:answered,missed` (set membership)
//! - `duration=range:30..120`, `duration=range:30..`, `duration=range:..120`
//! - `startedAt=dates:2024-03-01..2024-03-07` (date-only `to` covers the day)
//!
//! Sort syntax is `field` or `field.asc` / `field.desc`.

use super::ast::{Criterion, SortDirection, SortSpec};
use super::errors::{QueryError, QueryResult};
use crate::record::{parse_range_end, parse_range_start};

/// Parse a `field=op:value` filter argument
pub fn parse_filter(arg: &str) -> QueryResult<(String, Criterion)> {
    let (field, expr) = arg
        .split_once('=')
        .ok_or_else(|| QueryError::InvalidFilter(format!("expected field=op:value, got '{}'", arg)))?;

    let field = field.trim();
    if field.is_empty() {
        return Err(QueryError::InvalidFilter(format!("missing field in '{}'", arg)));
    }

    let (op, value) = expr
        .split_once(':')
        .ok_or_else(|| QueryError::InvalidFilter(format!("missing operator in '{}'", arg)))?;

    let criterion = match op.trim() {
        "in" => parse_set(value),
        "range" => parse_number_range(value)?,
        "dates" => parse_date_range(value)?,
        other => {
            return Err(QueryError::InvalidFilter(format!(
                "unknown operator '{}' (expected in, range or dates)",
                other
            )))
        }
    };

    Ok((field.to_string(), criterion))
}

/// Parse a sort argument (`field.direction`, ascending by default)
pub fn parse_sort(arg: &str) -> QueryResult<SortSpec> {
    let arg = arg.trim();
    if arg.is_empty() {
        return Err(QueryError::InvalidSort("sort field cannot be empty".to_string()));
    }

    let (field, direction) = match arg.rfind('.') {
        Some(dot_pos) => {
            let direction = match arg[dot_pos + 1..].to_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => {
                    return Err(QueryError::InvalidSort(format!(
                        "Invalid sort direction: {}",
                        other
                    )))
                }
            };
            (&arg[..dot_pos], direction)
        }
        None => (arg, SortDirection::Asc),
    };

    if field.is_empty() {
        return Err(QueryError::InvalidSort(format!("missing field in '{}'", arg)));
    }

    Ok(SortSpec {
        field: field.to_string(),
        direction,
    })
}

fn parse_set(value: &str) -> Criterion {
    Criterion::one_of(
        value
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty()),
    )
}

fn split_bounds(value: &str) -> QueryResult<(Option<&str>, Option<&str>)> {
    let (lo, hi) = value
        .split_once("..")
        .ok_or_else(|| QueryError::InvalidFilter(format!("expected min..max, got '{}'", value)))?;

    Ok((non_empty(lo), non_empty(hi)))
}

fn non_empty(s: &str) -> Option<&str> {
    let s = s.trim();
    (!s.is_empty()).then_some(s)
}

fn parse_number_range(value: &str) -> QueryResult<Criterion> {
    let (lo, hi) = split_bounds(value)?;

    let parse = |s: &str| -> QueryResult<f64> {
        s.parse::<f64>()
            .ok()
            .filter(|n| n.is_finite())
            .ok_or_else(|| QueryError::InvalidFilter(format!("Invalid number: {}", s)))
    };

    Ok(Criterion::NumberRange {
        min: lo.map(parse).transpose()?,
        max: hi.map(parse).transpose()?,
    })
}

fn parse_date_range(value: &str) -> QueryResult<Criterion> {
    let (lo, hi) = split_bounds(value)?;

    let from = lo
        .map(|s| parse_range_start(s).ok_or_else(|| QueryError::InvalidDate(s.to_string())))
        .transpose()?;
    let to = hi
        .map(|s| parse_range_end(s).ok_or_else(|| QueryError::InvalidDate(s.to_string())))
        .transpose()?;

    Ok(Criterion::dates(from, to))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::parse_instant;
    use serde_json::json;

    #[test]
    fn test_parse_set() {
        let (field, criterion) = parse_filter("status=in:answered, missed,").unwrap();
        assert_eq!(field, "status");
        assert_eq!(
            criterion,
            Criterion::OneOf {
                values: vec![json!("answered"), json!("missed")]
            }
        );
    }

    #[test]
    fn test_parse_number_range() {
        let (_, c) = parse_filter("duration=range:30..120").unwrap();
        assert_eq!(c, Criterion::between(30.0, 120.0));

        let (_, c) = parse_filter("duration=range:30..").unwrap();
        assert_eq!(c, Criterion::at_least(30.0));

        let (_, c) = parse_filter("duration=range:..120").unwrap();
        assert_eq!(c, Criterion::at_most(120.0));

        assert!(parse_filter("duration=range:abc..5").is_err());
        assert!(parse_filter("duration=range:5").is_err());
    }

    #[test]
    fn test_parse_date_range() {
        let (_, c) = parse_filter("startedAt=dates:2024-03-01..2024-03-07").unwrap();
        match c {
            Criterion::DateRange { from, to } => {
                assert_eq!(from, parse_instant("2024-03-01T00:00:00Z"));
                assert!(to.unwrap() > parse_instant("2024-03-07T23:59:59Z").unwrap());
            }
            other => panic!("unexpected criterion {:?}", other),
        }

        let err = parse_filter("startedAt=dates:soon..").unwrap_err();
        assert_eq!(err, QueryError::InvalidDate("soon".to_string()));
    }

    #[test]
    fn test_parse_filter_errors() {
        assert!(parse_filter("status").is_err());
        assert!(parse_filter("=in:a").is_err());
        assert!(parse_filter("status=answered").is_err());
        assert!(parse_filter("status=like:ans%").is_err());
    }

    #[test]
    fn test_parse_sort() {
        assert_eq!(parse_sort("startedAt.desc").unwrap(), SortSpec::desc("startedAt"));
        assert_eq!(parse_sort("agentName").unwrap(), SortSpec::asc("agentName"));
        assert_eq!(parse_sort("agentName.ASC").unwrap(), SortSpec::asc("agentName"));
        assert!(parse_sort("agentName.sideways").is_err());
        assert!(parse_sort(".desc").is_err());
        assert!(parse_sort("").is_err());
    }

    #[test]
    fn test_sort_display_parses_back() {
        for spec in [SortSpec::desc("startedAt"), SortSpec::asc("agentName")] {
            assert_eq!(parse_sort(&spec.to_string()).unwrap(), spec);
        }
        assert_eq!(SortSpec::desc("duration").to_string(), "duration.desc");
    }
}
