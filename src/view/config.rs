//! View configuration
//!
//! A view declares how each field of its records behaves in a query: how it is
//! normalized for matching, whether free-text search looks at it, and whether
//! it may be sorted on. The same engine serves every view; only this
//! configuration differs.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::query::Query;
use crate::state::Preferences;

/// Result type for view configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// View configuration errors
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("Failed to read view config: {0}")]
    Io(String),

    /// Config file is not valid JSON for a view
    #[error("Invalid view config JSON: {0}")]
    Parse(String),

    /// Config is well-formed but inconsistent
    #[error("Invalid view config: {0}")]
    Invalid(String),
}

/// How a field's values are interpreted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    /// Free text, matched case-insensitively
    #[default]
    Text,
    /// Phone number, matched on digits and `+` only
    Phone,
    /// Numeric value
    Number,
    /// ISO-8601 timestamp string
    Timestamp,
    /// Boolean flag
    Boolean,
}

impl FieldKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            FieldKind::Text => "text",
            FieldKind::Phone => "phone",
            FieldKind::Number => "number",
            FieldKind::Timestamp => "timestamp",
            FieldKind::Boolean => "boolean",
        }
    }
}

/// Per-field behavior within a view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldSpec {
    #[serde(default)]
    pub kind: FieldKind,
    /// Included in free-text search
    #[serde(default)]
    pub searchable: bool,
    /// May be used as the sort field
    #[serde(default)]
    pub sortable: bool,
}

impl FieldSpec {
    pub fn new(kind: FieldKind) -> Self {
        Self {
            kind,
            searchable: false,
            sortable: false,
        }
    }

    pub fn text() -> Self {
        Self::new(FieldKind::Text)
    }

    pub fn phone() -> Self {
        Self::new(FieldKind::Phone)
    }

    pub fn number() -> Self {
        Self::new(FieldKind::Number)
    }

    pub fn timestamp() -> Self {
        Self::new(FieldKind::Timestamp)
    }

    pub fn boolean() -> Self {
        Self::new(FieldKind::Boolean)
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }
}

/// Configuration of one console view
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewConfig {
    /// View name, e.g. `call-history`
    pub name: String,
    /// Preference storage key, e.g. `callHistory.prefs.v1`
    pub storage_key: String,
    /// Declared fields
    #[serde(default)]
    pub fields: BTreeMap<String, FieldSpec>,
    /// Preferences used when nothing valid is stored
    #[serde(default)]
    pub defaults: Preferences,
}

impl ViewConfig {
    /// Creates a view with no declared fields
    pub fn new(name: impl Into<String>, storage_key: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            storage_key: storage_key.into(),
            fields: BTreeMap::new(),
            defaults: Preferences::default(),
        }
    }

    /// Declares a field
    pub fn with_field(mut self, name: impl Into<String>, spec: FieldSpec) -> Self {
        self.fields.insert(name.into(), spec);
        self
    }

    /// Sets the default preferences
    pub fn with_defaults(mut self, defaults: Preferences) -> Self {
        self.defaults = defaults;
        self
    }

    /// Returns the kind of a field; undeclared fields are text
    pub fn field_kind(&self, name: &str) -> FieldKind {
        self.fields.get(name).map(|f| f.kind).unwrap_or_default()
    }

    /// Returns true if the field is declared sortable
    pub fn is_sortable(&self, name: &str) -> bool {
        self.fields.get(name).is_some_and(|f| f.sortable)
    }

    /// Returns the searchable fields with their kinds, in name order
    pub fn searchable_fields(&self) -> impl Iterator<Item = (&str, FieldKind)> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.searchable)
            .map(|(name, spec)| (name.as_str(), spec.kind))
    }

    /// Returns the sortable field names, in name order
    pub fn sortable_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|(_, spec)| spec.sortable)
            .map(|(name, _)| name.as_str())
    }

    /// Returns a fresh query carrying the default preferences
    pub fn default_query(&self) -> Query {
        self.defaults.apply_to(Query::new())
    }

    /// Load a view configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;

        let config: ViewConfig =
            serde_json::from_str(&content).map_err(|e| ConfigError::Parse(e.to_string()))?;

        config.validate()?;

        Ok(config)
    }

    /// Validate internal consistency
    pub fn validate(&self) -> ConfigResult<()> {
        if self.name.trim().is_empty() {
            return Err(ConfigError::Invalid("name cannot be empty".to_string()));
        }

        if self.storage_key.trim().is_empty() {
            return Err(ConfigError::Invalid("storage_key cannot be empty".to_string()));
        }

        if let Some(column) = self
            .defaults
            .columns
            .iter()
            .find(|c| !self.fields.contains_key(c.as_str()))
        {
            return Err(ConfigError::Invalid(format!(
                "default column '{}' is not a declared field",
                column
            )));
        }

        if !self.defaults.is_valid_for(self) {
            return Err(ConfigError::Invalid(format!(
                "defaults for view '{}' need a positive page_size and a sortable sort field",
                self.name
            )));
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::query::SortSpec;
    use serde_json::json;
    use tempfile::TempDir;

    fn sample_view() -> ViewConfig {
        ViewConfig::new("calls", "calls.prefs.v1")
            .with_field("caller", FieldSpec::phone().searchable())
            .with_field("agent", FieldSpec::text().searchable().sortable())
            .with_field("duration", FieldSpec::number().sortable())
    }

    #[test]
    fn test_field_lookup() {
        let view = sample_view();

        assert_eq!(view.field_kind("caller"), FieldKind::Phone);
        assert_eq!(view.field_kind("unknown"), FieldKind::Text);
        assert!(view.is_sortable("duration"));
        assert!(!view.is_sortable("caller"));
        assert!(!view.is_sortable("unknown"));

        let searchable: Vec<_> = view.searchable_fields().map(|(n, _)| n).collect();
        assert_eq!(searchable, vec!["agent", "caller"]);
    }

    #[test]
    fn test_validate_rejects_bad_defaults() {
        let view = sample_view().with_defaults(Preferences {
            sort: Some(SortSpec::asc("caller")),
            ..Preferences::default()
        });
        assert!(view.validate().is_err());

        let view = sample_view().with_defaults(Preferences {
            page_size: 0,
            ..Preferences::default()
        });
        assert!(view.validate().is_err());

        let view = sample_view().with_defaults(Preferences {
            columns: vec!["nope".to_string()],
            ..Preferences::default()
        });
        assert!(view.validate().is_err());

        assert!(ViewConfig::new("calls", " ").validate().is_err());
        assert!(sample_view().validate().is_ok());
    }

    #[test]
    fn test_load_from_file() {
        let tmp = TempDir::new().unwrap();
        let path = tmp.path().join("view.json");
        let body = json!({
            "name": "queues",
            "storage_key": "queues.prefs.v1",
            "fields": {
                "name": {"kind": "text", "searchable": true, "sortable": true},
                "waiting": {"kind": "number", "sortable": true}
            },
            "defaults": {"page_size": 5, "sort": {"field": "waiting", "direction": "desc"}}
        });
        fs::write(&path, body.to_string()).unwrap();

        let view = ViewConfig::load(&path).unwrap();
        assert_eq!(view.storage_key, "queues.prefs.v1");
        assert_eq!(view.default_query().page_size, 5);
        assert_eq!(view.default_query().sort, Some(SortSpec::desc("waiting")));
    }

    #[test]
    fn test_load_errors() {
        let tmp = TempDir::new().unwrap();

        let missing = ViewConfig::load(&tmp.path().join("absent.json"));
        assert!(matches!(missing, Err(ConfigError::Io(_))));

        let path = tmp.path().join("broken.json");
        fs::write(&path, "{not json").unwrap();
        assert!(matches!(ViewConfig::load(&path), Err(ConfigError::Parse(_))));
    }
}
