//! Record access abstraction
//!
//! The engine never knows domain types. Anything that can answer "what is the
//! value at this field path" is a [`Record`]; decoded JSON payloads from the
//! REST API implement it out of the box.

use crate::core::field::FieldValue;
use serde_json::{Map, Value};

/// One domain entity (product, coupon, review, ...) seen as field/value pairs
pub trait Record {
    /// Value at a field path, or `None` when absent or null.
    ///
    /// Paths are dotted (`"category.name"`) for nested objects.
    fn field(&self, path: &str) -> Option<FieldValue>;

    /// Identifier used by data sources for update and delete
    fn id(&self) -> Option<String> {
        self.field("id").and_then(|v| v.display_text())
    }
}

/// Walk a dotted path through nested JSON objects.
///
/// Array segments may be addressed by index (`"images.0.url"`).
pub fn lookup<'a>(root: &'a Value, path: &str) -> Option<&'a Value> {
    path.split('.').try_fold(root, |node, segment| match node {
        Value::Object(map) => map.get(segment),
        Value::Array(items) => segment.parse::<usize>().ok().and_then(|i| items.get(i)),
        _ => None,
    })
}

impl Record for Value {
    fn field(&self, path: &str) -> Option<FieldValue> {
        lookup(self, path)
            .map(FieldValue::from_json)
            .filter(|v| !v.is_null())
    }
}

impl Record for Map<String, Value> {
    fn field(&self, path: &str) -> Option<FieldValue> {
        let (head, rest) = match path.split_once('.') {
            Some((head, rest)) => (head, Some(rest)),
            None => (path, None),
        };
        let node = self.get(head)?;
        match rest {
            Some(rest) => node.field(rest),
            None => Some(FieldValue::from_json(node)).filter(|v| !v.is_null()),
        }
    }
}

impl<R: Record + ?Sized> Record for &R {
    fn field(&self, path: &str) -> Option<FieldValue> {
        (**self).field(path)
    }

    fn id(&self) -> Option<String> {
        (**self).id()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_top_level_field() {
        let record = json!({"id": 7, "code": "SPRING10"});
        assert_eq!(record.field("code"), Some(FieldValue::from("SPRING10")));
        assert_eq!(record.id(), Some("7".to_string()));
    }

    #[test]
    fn test_nested_field() {
        let record = json!({"category": {"name": "Shoes"}, "images": [{"url": "a.png"}]});
        assert_eq!(record.field("category.name"), Some(FieldValue::from("Shoes")));
        assert_eq!(record.field("images.0.url"), Some(FieldValue::from("a.png")));
        assert_eq!(record.field("images.3.url"), None);
    }

    #[test]
    fn test_missing_and_null_are_absent() {
        let record = json!({"deletedAt": null, "category": null});
        assert_eq!(record.field("deletedAt"), None);
        assert_eq!(record.field("category.name"), None);
        assert_eq!(record.field("nope"), None);
    }

    #[test]
    fn test_map_record() {
        let record = json!({"address": {"city": "Izmir"}, "note": null});
        let map = record.as_object().unwrap();
        assert_eq!(map.field("address.city"), Some(FieldValue::from("Izmir")));
        assert_eq!(map.field("note"), None);
    }
}
