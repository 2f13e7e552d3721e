//! Field value types and per-kind coercion

use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A polymorphic field value read from a record
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    DateTime(DateTime<Utc>),
    Null,
}

impl FieldValue {
    /// Check if the value is null
    pub fn is_null(&self) -> bool {
        matches!(self, FieldValue::Null)
    }

    /// Convert a decoded JSON value into a field value.
    ///
    /// Nested objects and arrays are kept as their compact JSON text so they
    /// still take part in free-text search.
    pub fn from_json(value: &Value) -> Self {
        match value {
            Value::Null => FieldValue::Null,
            Value::Bool(b) => FieldValue::Boolean(*b),
            Value::Number(n) => match n.as_i64() {
                Some(i) => FieldValue::Integer(i),
                None => n.as_f64().map_or(FieldValue::Null, FieldValue::Float),
            },
            Value::String(s) => FieldValue::String(s.clone()),
            Value::Array(_) | Value::Object(_) => FieldValue::String(value.to_string()),
        }
    }

    /// Text shown to users and matched by free-text search
    pub fn display_text(&self) -> Option<String> {
        match self {
            FieldValue::String(s) => Some(s.clone()),
            FieldValue::Integer(i) => Some(i.to_string()),
            FieldValue::Float(f) => Some(f.to_string()),
            FieldValue::Boolean(b) => Some(b.to_string()),
            FieldValue::DateTime(dt) => Some(dt.to_rfc3339()),
            FieldValue::Null => None,
        }
    }

    /// Numeric reading of the value; booleans are not numbers
    pub fn to_number(&self) -> Option<f64> {
        match self {
            FieldValue::Integer(i) => Some(*i as f64),
            FieldValue::Float(f) if !f.is_nan() => Some(*f),
            FieldValue::String(s) => s.trim().parse::<f64>().ok().filter(|f| !f.is_nan()),
            _ => None,
        }
    }

    /// Boolean reading of the value
    pub fn to_boolean(&self) -> Option<bool> {
        match self {
            FieldValue::Boolean(b) => Some(*b),
            FieldValue::Integer(0) => Some(false),
            FieldValue::Integer(1) => Some(true),
            FieldValue::String(s) => match s.trim().to_ascii_lowercase().as_str() {
                "true" => Some(true),
                "false" => Some(false),
                _ => None,
            },
            _ => None,
        }
    }

    /// Instant reading of the value, as epoch milliseconds
    pub fn to_instant(&self) -> Option<i64> {
        match self {
            FieldValue::DateTime(dt) => Some(dt.timestamp_millis()),
            FieldValue::Integer(ms) => Some(*ms),
            FieldValue::String(s) => parse_instant(s).map(|dt| dt.timestamp_millis()),
            _ => None,
        }
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Integer(i)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Boolean(b)
    }
}

/// Parse the date formats the REST API emits.
///
/// Accepts RFC 3339, naive `YYYY-MM-DDTHH:MM:SS` / `YYYY-MM-DD HH:MM:SS`
/// (taken as UTC) and bare `YYYY-MM-DD` (midnight UTC).
pub fn parse_instant(text: &str) -> Option<DateTime<Utc>> {
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(text) {
        return Some(dt.with_timezone(&Utc));
    }
    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(text, format) {
            return Some(Utc.from_utc_datetime(&naive));
        }
    }
    NaiveDate::parse_from_str(text, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| Utc.from_utc_datetime(&naive))
}

/// Case folding used by search, text sorting and distinct counts
pub fn fold_case(text: &str) -> String {
    text.to_lowercase()
}

/// Declared type of a field, deciding how its values compare
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum FieldKind {
    Text,
    Number,
    Boolean,
    Date,
}

impl FieldKind {
    /// Coerce a raw value into a comparable key of this kind.
    ///
    /// Returns `None` when the value is missing or cannot be read as this kind.
    pub fn key(self, value: &FieldValue) -> Option<FieldKey> {
        match self {
            FieldKind::Text => value.display_text().map(|t| FieldKey::Text(fold_case(&t))),
            FieldKind::Number => value.to_number().map(FieldKey::Number),
            FieldKind::Boolean => value.to_boolean().map(FieldKey::Boolean),
            FieldKind::Date => value.to_instant().map(FieldKey::Instant),
        }
    }

    /// Best guess of a kind from a single value, used for undeclared fields
    pub fn infer(value: &FieldValue) -> Self {
        match value {
            FieldValue::Integer(_) | FieldValue::Float(_) => FieldKind::Number,
            FieldValue::Boolean(_) => FieldKind::Boolean,
            FieldValue::DateTime(_) => FieldKind::Date,
            _ => FieldKind::Text,
        }
    }
}

/// A coerced, totally ordered field key
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKey {
    Text(String),
    Number(f64),
    Boolean(bool),
    Instant(i64),
}

impl FieldKey {
    /// Compare two keys of the same kind; keys of different kinds are equal
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (FieldKey::Text(a), FieldKey::Text(b)) => a.cmp(b),
            (FieldKey::Number(a), FieldKey::Number(b)) => a.total_cmp(b),
            (FieldKey::Boolean(a), FieldKey::Boolean(b)) => a.cmp(b),
            (FieldKey::Instant(a), FieldKey::Instant(b)) => a.cmp(b),
            _ => Ordering::Equal,
        }
    }
}

/// Order two optional keys with missing keys first
pub fn compare_keys(a: Option<&FieldKey>, b: Option<&FieldKey>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.compare(b),
        (None, Some(_)) => Ordering::Less,
        (Some(_), None) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}
