//! Query structures
//!
//! A [`Query`] is the declarative filter/sort/page specification applied to
//! one record collection. Queries are values: every mutation produces a new
//! query through [`Query::merged`], never an in-place edit.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{de, Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::record::{parse_range_end, parse_range_start};

/// Default number of rows per page
pub const DEFAULT_PAGE_SIZE: usize = 10;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn range_start<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    range_bound(deserializer, parse_range_start)
}

fn range_end<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    range_bound(deserializer, parse_range_end)
}

fn range_bound<'de, D>(
    deserializer: D,
    parse: fn(&str) -> Option<DateTime<Utc>>,
) -> Result<Option<DateTime<Utc>>, D::Error>
where
    D: Deserializer<'de>,
{
    match Option::<String>::deserialize(deserializer)? {
        Some(text) => parse(&text)
            .map(Some)
            .ok_or_else(|| de::Error::custom(format!("invalid date bound '{}'", text))),
        None => Ok(None),
    }
}

/// One filter criterion on a single field
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Criterion {
    /// Field value is one of the given values
    OneOf { values: Vec<Value> },
    /// Numeric value within an inclusive range
    NumberRange {
        #[serde(default)]
        min: Option<f64>,
        #[serde(default)]
        max: Option<f64>,
    },
    /// Timestamp within an inclusive range of instants.
    ///
    /// Bounds read like `--filter field=dates:from..to`: a date-only `to`
    /// covers the whole day.
    DateRange {
        #[serde(default, deserialize_with = "range_start")]
        from: Option<DateTime<Utc>>,
        #[serde(default, deserialize_with = "range_end")]
        to: Option<DateTime<Utc>>,
    },
}

impl Criterion {
    /// Set membership over string values
    pub fn one_of<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Criterion::OneOf {
            values: values.into_iter().map(|v| Value::String(v.into())).collect(),
        }
    }

    /// Inclusive numeric range
    pub fn between(min: f64, max: f64) -> Self {
        Criterion::NumberRange {
            min: Some(min),
            max: Some(max),
        }
    }

    /// Numeric lower bound only
    pub fn at_least(min: f64) -> Self {
        Criterion::NumberRange {
            min: Some(min),
            max: None,
        }
    }

    /// Numeric upper bound only
    pub fn at_most(max: f64) -> Self {
        Criterion::NumberRange {
            min: None,
            max: Some(max),
        }
    }

    /// Inclusive date range
    pub fn dates(from: Option<DateTime<Utc>>, to: Option<DateTime<Utc>>) -> Self {
        Criterion::DateRange { from, to }
    }

    /// Returns true if this criterion constrains anything.
    ///
    /// Empty value sets and unbounded ranges produce no predicate.
    pub fn is_active(&self) -> bool {
        match self {
            Criterion::OneOf { values } => !values.is_empty(),
            Criterion::NumberRange { min, max } => min.is_some() || max.is_some(),
            Criterion::DateRange { from, to } => from.is_some() || to.is_some(),
        }
    }
}

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        }
    }
}

/// Sort specification
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// Field to sort by
    pub field: String,
    /// Sort direction
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn asc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Asc,
        }
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            direction: SortDirection::Desc,
        }
    }
}

/// Renders as `field.asc` or `field.desc`, the form `parse_sort` reads
impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.field, self.direction.as_str())
    }
}

/// Declarative query over a record collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Query {
    /// Free-text search over the view's searchable fields
    #[serde(default)]
    pub search: Option<String>,
    /// Per-field criteria, all combined with AND
    #[serde(default)]
    pub filters: BTreeMap<String, Criterion>,
    /// Sort specification (source order when absent)
    #[serde(default)]
    pub sort: Option<SortSpec>,
    /// Zero-based page index
    #[serde(default)]
    pub page: usize,
    /// Rows per page, must be positive
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    /// Visible columns; display only, ignored by the pipeline
    #[serde(default)]
    pub columns: Vec<String>,
}

impl Default for Query {
    fn default() -> Self {
        Self {
            search: None,
            filters: BTreeMap::new(),
            sort: None,
            page: 0,
            page_size: DEFAULT_PAGE_SIZE,
            columns: Vec::new(),
        }
    }
}

impl Query {
    /// Creates an empty query with the default page size
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the free-text search
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    /// Sets the criterion for a field, replacing any previous one
    pub fn with_filter(mut self, field: impl Into<String>, criterion: Criterion) -> Self {
        self.filters.insert(field.into(), criterion);
        self
    }

    /// Sets the sort specification
    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Sets the page index
    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page;
        self
    }

    /// Sets the page size
    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Sets the visible columns
    pub fn with_columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = columns.into_iter().map(Into::into).collect();
        self
    }

    /// Returns the trimmed search text if it is non-empty
    pub fn active_search(&self) -> Option<&str> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
    }

    /// Returns a new query with the patch shallow-merged over this one.
    ///
    /// Changing search, filters, sort or page size without an explicit page
    /// returns to the first page.
    pub fn merged(&self, patch: &QueryPatch) -> Query {
        let mut next = self.clone();

        if let Some(search) = &patch.search {
            next.search = search.clone();
        }
        if let Some(filters) = &patch.filters {
            next.filters = filters.clone();
        }
        if let Some(sort) = &patch.sort {
            next.sort = sort.clone();
        }
        if let Some(page_size) = patch.page_size {
            next.page_size = page_size;
        }
        if let Some(columns) = &patch.columns {
            next.columns = columns.clone();
        }

        match patch.page {
            Some(page) => next.page = page,
            None => {
                let reshaped = next.search != self.search
                    || next.filters != self.filters
                    || next.sort != self.sort
                    || next.page_size != self.page_size;
                if reshaped {
                    next.page = 0;
                }
            }
        }

        next
    }
}

/// A shallow partial update of a [`Query`].
///
/// Each present field replaces the corresponding query field wholesale.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct QueryPatch {
    pub search: Option<Option<String>>,
    pub filters: Option<BTreeMap<String, Criterion>>,
    pub sort: Option<Option<SortSpec>>,
    pub page: Option<usize>,
    pub page_size: Option<usize>,
    pub columns: Option<Vec<String>>,
}

impl QueryPatch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(Some(search.into()));
        self
    }

    pub fn clear_search(mut self) -> Self {
        self.search = Some(None);
        self
    }

    pub fn filters(mut self, filters: BTreeMap<String, Criterion>) -> Self {
        self.filters = Some(filters);
        self
    }

    pub fn sort(mut self, sort: SortSpec) -> Self {
        self.sort = Some(Some(sort));
        self
    }

    pub fn clear_sort(mut self) -> Self {
        self.sort = Some(None);
        self
    }

    pub fn page(mut self, page: usize) -> Self {
        self.page = Some(page);
        self
    }

    pub fn page_size(mut self, page_size: usize) -> Self {
        self.page_size = Some(page_size);
        self
    }

    pub fn columns<I, S>(mut self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.columns = Some(columns.into_iter().map(Into::into).collect());
        self
    }

    /// Returns true if the patch carries no changes
    pub fn is_empty(&self) -> bool {
        *self == QueryPatch::default()
    }
}
