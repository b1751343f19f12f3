//! Record access for the query engine
//!
//! The engine is generic over record shape. A record only has to expose its
//! fields by name through [`Record::field`]. Missing fields and JSON `null`
//! both read as [`FieldValue::Null`]; fields are never assumed present.

mod timestamp;

pub use timestamp::{parse_instant, parse_range_end, parse_range_start};

use serde_json::{Map, Value};

/// A borrowed view of one field of a record
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FieldValue<'a> {
    /// Missing or null
    Null,
    /// Boolean flag
    Bool(bool),
    /// Numeric value
    Number(f64),
    /// String value (timestamps are strings until parsed)
    Text(&'a str),
}

impl<'a> FieldValue<'a> {
    /// Returns true if the field is missing or null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Returns the numeric value, if any
    pub fn as_number(&self) -> Option<f64> {
        match self {
            FieldValue::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Returns the string value, if any
    pub fn as_text(&self) -> Option<&'a str> {
        match self {
            FieldValue::Text(s) => Some(s),
            _ => None,
        }
    }

    /// Converts a JSON value into a field value.
    ///
    /// Arrays and objects are not flat field types and read as null.
    pub fn from_json(value: &'a Value) -> Self {
        match value {
            Value::Bool(b) => FieldValue::Bool(*b),
            Value::Number(n) => n.as_f64().map(FieldValue::Number).unwrap_or(FieldValue::Null),
            Value::String(s) => FieldValue::Text(s),
            Value::Null | Value::Array(_) | Value::Object(_) => FieldValue::Null,
        }
    }
}

/// A flat record with named fields
pub trait Record {
    /// Returns the value of the named field
    fn field(&self, name: &str) -> FieldValue<'_>;
}

impl Record for Value {
    fn field(&self, name: &str) -> FieldValue<'_> {
        self.get(name).map(FieldValue::from_json).unwrap_or(FieldValue::Null)
    }
}

impl Record for Map<String, Value> {
    fn field(&self, name: &str) -> FieldValue<'_> {
        self.get(name).map(FieldValue::from_json).unwrap_or(FieldValue::Null)
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, name: &str) -> FieldValue<'_> {
        (**self).field(name)
    }
}
