//! Dynamic property values used by in-memory filtering and sorting

use chrono::{DateTime, NaiveDate, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// A polymorphic property value exposed by entities for querying.
///
/// Filters arrive over the wire as plain text; [`FieldValue::compare_to_wire`]
/// interprets that text in the value's own type, so an integer property is
/// compared numerically while a string property is compared lexicographically.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Date(NaiveDate),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Canonical wire representation of this value.
    ///
    /// Dates render as ISO-8601 (`2024-05-01`), datetimes as RFC 3339; all
    /// other variants use their plain display form. The CRUD client and
    /// endpoint both go through this function, keeping the two in lockstep.
    pub fn to_wire(&self) -> String {
        match self {
            FieldValue::String(s) => s.clone(),
            FieldValue::Integer(i) => i.to_string(),
            FieldValue::Float(f) => f.to_string(),
            FieldValue::Boolean(b) => b.to_string(),
            FieldValue::Date(d) => d.to_string(),
            FieldValue::DateTime(dt) => dt.to_rfc3339_opts(SecondsFormat::AutoSi, true),
            FieldValue::Null => "null".to_string(),
        }
    }

    /// Compare this value against its wire representation.
    ///
    /// Returns `None` when the raw text cannot be parsed as the value's own
    /// type, or when the value is `Null`. Filters treat `None` as "matches
    /// nothing" rather than erroring out.
    pub fn compare_to_wire(&self, raw: &str) -> Option<Ordering> {
        match self {
            FieldValue::String(s) => Some(s.as_str().cmp(raw)),
            FieldValue::Integer(i) => raw.parse::<i64>().ok().map(|r| i.cmp(&r)),
            FieldValue::Float(f) => raw.parse::<f64>().ok().and_then(|r| f.partial_cmp(&r)),
            FieldValue::Boolean(b) => raw.parse::<bool>().ok().map(|r| b.cmp(&r)),
            FieldValue::Date(d) => raw.parse::<NaiveDate>().ok().map(|r| d.cmp(&r)),
            FieldValue::DateTime(dt) => DateTime::parse_from_rfc3339(raw)
                .ok()
                .map(|r| dt.cmp(&r.with_timezone(&Utc))),
            FieldValue::Null => None,
        }
    }

    /// Compare two values of the same variant, used by sort clauses.
    ///
    /// Mixed-variant comparisons return `None`; a well-formed entity exposes
    /// the same variant for a property across all instances.
    pub fn partial_cmp_value(&self, other: &FieldValue) -> Option<Ordering> {
        match (self, other) {
            (FieldValue::String(a), FieldValue::String(b)) => Some(a.cmp(b)),
            (FieldValue::Integer(a), FieldValue::Integer(b)) => Some(a.cmp(b)),
            (FieldValue::Float(a), FieldValue::Float(b)) => a.partial_cmp(b),
            (FieldValue::Boolean(a), FieldValue::Boolean(b)) => Some(a.cmp(b)),
            (FieldValue::Date(a), FieldValue::Date(b)) => Some(a.cmp(b)),
            (FieldValue::DateTime(a), FieldValue::DateTime(b)) => Some(a.cmp(b)),
            _ => None,
        }
    }

    /// Get the textual content for prefix and full-text matching.
    ///
    /// Only `String` values participate in text matching.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }
}

impl From<&str> for FieldValue {
    fn from(v: &str) -> Self {
        FieldValue::String(v.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(v: String) -> Self {
        FieldValue::String(v)
    }
}

impl From<i64> for FieldValue {
    fn from(v: i64) -> Self {
        FieldValue::Integer(v)
    }
}

impl From<i32> for FieldValue {
    fn from(v: i32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<i16> for FieldValue {
    fn from(v: i16) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(v: u32) -> Self {
        FieldValue::Integer(v as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(v: f64) -> Self {
        FieldValue::Float(v)
    }
}

impl From<f32> for FieldValue {
    fn from(v: f32) -> Self {
        FieldValue::Float(v as f64)
    }
}

impl From<bool> for FieldValue {
    fn from(v: bool) -> Self {
        FieldValue::Boolean(v)
    }
}

impl From<NaiveDate> for FieldValue {
    fn from(v: NaiveDate) -> Self {
        FieldValue::Date(v)
    }
}

impl From<DateTime<Utc>> for FieldValue {
    fn from(v: DateTime<Utc>) -> Self {
        FieldValue::DateTime(v)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(v: Option<T>) -> Self {
        match v {
            Some(inner) => inner.into(),
            None => FieldValue::Null,
        }
    }
}
