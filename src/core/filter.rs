//! Field filters
//!
//! Filters are evaluated against the declared [`FieldKind`] of their field, so
//! `"true"` matches a boolean column and `"2024-01-01"` a date column. A
//! missing or uncoercible value fails every active filter.

use crate::core::field::{FieldKind, FieldValue, compare_keys, fold_case};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cmp::Ordering;

/// A single test applied to one field
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(tag = "op", content = "value", rename_all = "snake_case")]
pub enum Filter {
    /// No-op, e.g. the "all" entry of a dropdown
    #[default]
    Unset,
    Equals(FieldValue),
    NotEquals(FieldValue),
    OneOf(Vec<FieldValue>),
    GreaterThan(FieldValue),
    AtLeast(FieldValue),
    LessThan(FieldValue),
    AtMost(FieldValue),
    /// Case-insensitive substring of the display text
    Contains(String),
    /// Any non-missing value
    Present,
}

fn is_blank(value: &FieldValue) -> bool {
    match value {
        FieldValue::Null => true,
        FieldValue::String(s) => s.trim().is_empty(),
        _ => false,
    }
}

impl Filter {
    /// Whether this filter can exclude anything.
    ///
    /// Unset filters, blank operands and empty option lists are no-ops.
    pub fn is_active(&self) -> bool {
        match self {
            Filter::Unset => false,
            Filter::Equals(v)
            | Filter::NotEquals(v)
            | Filter::GreaterThan(v)
            | Filter::AtLeast(v)
            | Filter::LessThan(v)
            | Filter::AtMost(v) => !is_blank(v),
            Filter::OneOf(values) => values.iter().any(|v| !is_blank(v)),
            Filter::Contains(needle) => !needle.trim().is_empty(),
            Filter::Present => true,
        }
    }

    /// Test a record's value, read as `kind`
    pub fn matches(&self, kind: FieldKind, value: Option<&FieldValue>) -> bool {
        if !self.is_active() {
            return true;
        }
        let Some(value) = value else {
            return false;
        };

        match self {
            Filter::Unset | Filter::Present => true,
            Filter::Equals(expected) => equals(kind, value, expected) == Some(true),
            Filter::NotEquals(expected) => equals(kind, value, expected) == Some(false),
            Filter::OneOf(options) => options
                .iter()
                .filter(|o| !is_blank(o))
                .any(|o| equals(kind, value, o) == Some(true)),
            Filter::GreaterThan(bound) => compare(kind, value, bound) == Some(Ordering::Greater),
            Filter::AtLeast(bound) => {
                matches!(compare(kind, value, bound), Some(Ordering::Greater | Ordering::Equal))
            }
            Filter::LessThan(bound) => compare(kind, value, bound) == Some(Ordering::Less),
            Filter::AtMost(bound) => {
                matches!(compare(kind, value, bound), Some(Ordering::Less | Ordering::Equal))
            }
            Filter::Contains(needle) => value
                .display_text()
                .is_some_and(|text| fold_case(&text).contains(&fold_case(needle.trim()))),
        }
    }

    /// Build a filter from one entry of the query-string JSON form
    fn from_json(operator: Option<&str>, value: &Value) -> Self {
        let operand = FieldValue::from_json(value);
        match (operator, value) {
            (_, Value::Null) => Filter::Unset,
            (None, Value::Array(items)) => {
                Filter::OneOf(items.iter().map(FieldValue::from_json).collect())
            }
            (None, _) => Filter::Equals(operand),
            (Some(">"), _) => Filter::GreaterThan(operand),
            (Some(">="), _) => Filter::AtLeast(operand),
            (Some("<"), _) => Filter::LessThan(operand),
            (Some("<="), _) => Filter::AtMost(operand),
            (Some(_), _) => Filter::Unset,
        }
    }
}

/// Exact equality by kind. `None` when either side cannot be read as `kind`.
fn equals(kind: FieldKind, value: &FieldValue, expected: &FieldValue) -> Option<bool> {
    match kind {
        FieldKind::Text => Some(value.display_text()? == expected.display_text()?),
        _ => Some(compare(kind, value, expected)? == Ordering::Equal),
    }
}

fn compare(kind: FieldKind, value: &FieldValue, bound: &FieldValue) -> Option<Ordering> {
    let left = kind.key(value)?;
    let right = kind.key(bound)?;
    Some(compare_keys(Some(&left), Some(&right)))
}

/// A filter bound to a field name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldFilter {
    pub field: String,
    #[serde(default)]
    pub filter: Filter,
}

impl FieldFilter {
    pub fn new(field: impl Into<String>, filter: Filter) -> Self {
        Self {
            field: field.into(),
            filter,
        }
    }
}

/// All filters of a query; every active entry must pass
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FilterSet(Vec<FieldFilter>);

impl FilterSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a filter, keeping any existing ones on the same field
    pub fn and(mut self, field: impl Into<String>, filter: Filter) -> Self {
        self.0.push(FieldFilter::new(field, filter));
        self
    }

    /// Replace every filter on `field` with `filter`
    pub fn set(&mut self, field: &str, filter: Filter) {
        self.remove(field);
        self.0.push(FieldFilter::new(field, filter));
    }

    /// Drop every filter on `field`
    pub fn remove(&mut self, field: &str) {
        self.0.retain(|f| f.field != field);
    }

    pub fn iter(&self) -> impl Iterator<Item = &FieldFilter> {
        self.0.iter()
    }

    /// Filters that can exclude records
    pub fn active(&self) -> impl Iterator<Item = &FieldFilter> {
        self.0.iter().filter(|f| f.filter.is_active())
    }

    /// True when no filter can exclude anything
    pub fn is_empty(&self) -> bool {
        self.active().next().is_none()
    }

    /// Parse the query-string JSON form.
    ///
    /// # Format
    /// - Exact match: `{"status": "active"}`
    /// - One of: `{"type": ["YUZDE", "SABIT"]}`
    /// - Comparison: `{"price>": 10, "price<=": 50}`
    ///
    /// Non-object input yields an empty set.
    pub fn from_query_json(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let filters = object
            .iter()
            .map(|(key, value)| {
                let (field, operator) = split_operator(key);
                FieldFilter::new(field, Filter::from_json(operator, value))
            })
            .collect();
        Self(filters)
    }
}

impl FromIterator<FieldFilter> for FilterSet {
    fn from_iter<I: IntoIterator<Item = FieldFilter>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

fn split_operator(key: &str) -> (&str, Option<&str>) {
    for operator in [">=", "<=", ">", "<"] {
        if let Some(field) = key.strip_suffix(operator) {
            return (field, Some(operator));
        }
    }
    (key, None)
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_unset_and_blank_are_noops() {
        assert!(Filter::Unset.matches(FieldKind::Text, None));
        assert!(Filter::Equals(FieldValue::from("")).matches(FieldKind::Text, None));
        assert!(Filter::Contains("  ".into()).matches(FieldKind::Text, None));
        assert!(!Filter::OneOf(vec![]).is_active());
    }

    #[test]
    fn test_missing_value_fails_active_filter() {
        assert!(!Filter::Equals(true.into()).matches(FieldKind::Boolean, None));
        assert!(!Filter::NotEquals(true.into()).matches(FieldKind::Boolean, None));
        assert!(!Filter::Present.matches(FieldKind::Text, None));
    }

    #[test]
    fn test_equals_by_kind() {
        let active = FieldValue::Boolean(true);
        assert!(Filter::Equals("true".into()).matches(FieldKind::Boolean, Some(&active)));
        assert!(!Filter::Equals(false.into()).matches(FieldKind::Boolean, Some(&active)));

        let price = FieldValue::Float(10.0);
        assert!(Filter::Equals(10i64.into()).matches(FieldKind::Number, Some(&price)));

        let code = FieldValue::from("YUZDE");
        assert!(Filter::Equals("YUZDE".into()).matches(FieldKind::Text, Some(&code)));
        assert!(!Filter::Equals("yuzde".into()).matches(FieldKind::Text, Some(&code)));
    }

    #[test]
    fn test_uncoercible_value_fails() {
        let junk = FieldValue::from("n/a");
        assert!(!Filter::AtLeast(5i64.into()).matches(FieldKind::Number, Some(&junk)));
        assert!(!Filter::NotEquals(5i64.into()).matches(FieldKind::Number, Some(&junk)));
    }

    #[test]
    fn test_range_filters() {
        let stock = FieldValue::Integer(5);
        assert!(Filter::GreaterThan(0i64.into()).matches(FieldKind::Number, Some(&stock)));
        assert!(Filter::AtLeast(5i64.into()).matches(FieldKind::Number, Some(&stock)));
        assert!(!Filter::LessThan(5i64.into()).matches(FieldKind::Number, Some(&stock)));
        assert!(Filter::AtMost(5i64.into()).matches(FieldKind::Number, Some(&stock)));

        let created = FieldValue::from("2024-05-01T12:00:00Z");
        assert!(Filter::AtLeast("2024-05-01".into()).matches(FieldKind::Date, Some(&created)));
        assert!(Filter::LessThan("2024-05-02".into()).matches(FieldKind::Date, Some(&created)));
    }

    #[test]
    fn test_one_of_and_contains() {
        let kind = FieldValue::from("SABIT");
        let filter = Filter::OneOf(vec!["YUZDE".into(), "SABIT".into()]);
        assert!(filter.matches(FieldKind::Text, Some(&kind)));

        let name = FieldValue::from("Blue Running Shoe");
        assert!(Filter::Contains("running".into()).matches(FieldKind::Text, Some(&name)));
        assert!(!Filter::Contains("boot".into()).matches(FieldKind::Text, Some(&name)));
    }

    #[test]
    fn test_parse_query_json() {
        let set = FilterSet::from_query_json(&json!({
            "status": "active",
            "price>=": 10,
            "price<": 50,
            "type": ["YUZDE", "SABIT"],
            "brand": null
        }));

        let filters: Vec<_> = set.iter().collect();
        assert_eq!(filters.len(), 5);
        assert!(filters.contains(&&FieldFilter::new("status", Filter::Equals("active".into()))));
        assert!(filters.contains(&&FieldFilter::new("price", Filter::AtLeast(10i64.into()))));
        assert!(filters.contains(&&FieldFilter::new("price", Filter::LessThan(50i64.into()))));
        assert!(filters.contains(&&FieldFilter::new("brand", Filter::Unset)));
        assert_eq!(set.active().count(), 4);
    }

    #[test]
    fn test_set_replaces_field_filters() {
        let mut set = FilterSet::new()
            .and("price", Filter::AtLeast(1i64.into()))
            .and("price", Filter::AtMost(9i64.into()));
        set.set("price", Filter::Equals(5i64.into()));
        assert_eq!(set.iter().count(), 1);

        set.remove("price");
        assert!(set.is_empty());
    }

    #[test]
    fn test_yaml_form() {
        let filter: FieldFilter =
            serde_yaml::from_str("field: active\nfilter:\n  op: equals\n  value: true\n").unwrap();
        assert_eq!(filter, FieldFilter::new("active", Filter::Equals(true.into())));

        let present: Filter = serde_yaml::from_str("op: present\n").unwrap();
        assert_eq!(present, Filter::Present);
    }
}
