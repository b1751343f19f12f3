//! Persisted preference subset of a query
//!
//! Only display preferences survive a reload: visible columns, page size and
//! sort. Search text, filters and the page index are transient.
//!
//! Stored layout, one JSON object per view key:
//!
//! ```json
//! {"columns": ["startedAt", "agentName"], "page_size": 25,
//!  "sort": {"field": "startedAt", "direction": "desc"}}
//! ```
//!
//! A stored entry may omit keys; those keep the view's defaults. An explicit
//! `"sort": null` means "unsorted".

use serde::{Deserialize, Deserializer, Serialize};

use crate::query::{Query, SortSpec, DEFAULT_PAGE_SIZE};
use crate::view::ViewConfig;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

/// User-adjustable display preferences of one view
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Preferences {
    #[serde(default)]
    pub columns: Vec<String>,
    #[serde(default = "default_page_size")]
    pub page_size: usize,
    #[serde(default)]
    pub sort: Option<SortSpec>,
}

impl Default for Preferences {
    fn default() -> Self {
        Self {
            columns: Vec::new(),
            page_size: DEFAULT_PAGE_SIZE,
            sort: None,
        }
    }
}

impl Preferences {
    /// Extracts the persisted subset of a query
    pub fn of(query: &Query) -> Self {
        Self {
            columns: query.columns.clone(),
            page_size: query.page_size,
            sort: query.sort.clone(),
        }
    }

    /// Returns the query with these preferences applied
    pub fn apply_to(&self, query: Query) -> Query {
        Query {
            columns: self.columns.clone(),
            page_size: self.page_size,
            sort: self.sort.clone(),
            ..query
        }
    }

    /// Returns true if these preferences can drive a query on the view.
    ///
    /// Requires a positive page size, a sortable sort field, and (when the
    /// view declares fields) only declared columns.
    pub fn is_valid_for(&self, view: &ViewConfig) -> bool {
        let sort_ok = self
            .sort
            .as_ref()
            .map_or(true, |sort| view.is_sortable(&sort.field));

        let columns_ok = view.fields.is_empty()
            || self.columns.iter().all(|c| view.fields.contains_key(c.as_str()));

        self.page_size > 0 && sort_ok && columns_ok
    }
}

/// A preference entry as read back from storage.
///
/// Every key is optional so a partial entry can be laid over the view's
/// defaults instead of over the type defaults.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct StoredPreferences {
    #[serde(default)]
    pub columns: Option<Vec<String>>,
    #[serde(default)]
    pub page_size: Option<usize>,
    /// Outer `None`: key absent. `Some(None)`: stored as `null`.
    #[serde(default, deserialize_with = "present")]
    pub sort: Option<Option<SortSpec>>,
}

impl StoredPreferences {
    /// Fills the missing keys from `defaults`
    pub fn over(self, defaults: &Preferences) -> Preferences {
        Preferences {
            columns: self.columns.unwrap_or_else(|| defaults.columns.clone()),
            page_size: self.page_size.unwrap_or(defaults.page_size),
            sort: self.sort.unwrap_or_else(|| defaults.sort.clone()),
        }
    }
}

// Only called when the key is present, so `null` becomes `Some(None)`
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    T::deserialize(deserializer).map(Some)
}
