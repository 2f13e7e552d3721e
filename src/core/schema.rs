//! Per-record-type list declarations
//!
//! A [`ListSchema`] is all a list page needs to configure: which fields exist,
//! how they are typed, and which of them take part in search, filtering,
//! sorting and export. Schemas are plain data so they can be declared in code
//! (see [`crate::catalog`]) or loaded from YAML.

use crate::core::error::ConfigError;
use crate::core::field::{FieldKind, FieldValue};
use crate::core::query::SortSpec;
use crate::core::record::Record;
use crate::core::stats::{Measure, StatDef};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Page size observed on every list page of the console
pub const DEFAULT_PAGE_SIZE: usize = 20;

fn default_page_size() -> usize {
    DEFAULT_PAGE_SIZE
}

fn default_true() -> bool {
    true
}

/// Declaration of one field of a record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FieldDef {
    /// Name used by queries (`sort=name`, `filter={"name": ..}`)
    pub name: String,

    /// Dotted path into the record, when it differs from `name`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub path: Option<String>,

    pub kind: FieldKind,

    /// Column caption, used as the CSV header
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,

    #[serde(default)]
    pub searchable: bool,

    #[serde(default)]
    pub filterable: bool,

    #[serde(default)]
    pub sortable: bool,

    #[serde(default = "default_true")]
    pub exportable: bool,
}

impl FieldDef {
    pub fn new(name: impl Into<String>, kind: FieldKind) -> Self {
        Self {
            name: name.into(),
            path: None,
            kind,
            label: None,
            searchable: false,
            filterable: false,
            sortable: false,
            exportable: true,
        }
    }

    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Text)
    }

    pub fn number(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Number)
    }

    pub fn boolean(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Boolean)
    }

    pub fn date(name: impl Into<String>) -> Self {
        Self::new(name, FieldKind::Date)
    }

    /// Read the value from a nested path instead of `name`
    pub fn at(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    pub fn labeled(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn searchable(mut self) -> Self {
        self.searchable = true;
        self
    }

    pub fn filterable(mut self) -> Self {
        self.filterable = true;
        self
    }

    pub fn sortable(mut self) -> Self {
        self.sortable = true;
        self
    }

    /// Leave this field out of CSV exports
    pub fn internal(mut self) -> Self {
        self.exportable = false;
        self
    }

    pub fn path(&self) -> &str {
        self.path.as_deref().unwrap_or(&self.name)
    }

    pub fn label(&self) -> &str {
        self.label.as_deref().unwrap_or(&self.name)
    }

    /// Read this field from a record
    pub fn read<R: Record + ?Sized>(&self, record: &R) -> Option<FieldValue> {
        record.field(self.path())
    }
}

/// Everything a list page declares about its record type
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ListSchema {
    /// List name (e.g., "coupons", "products")
    pub name: String,

    #[serde(default = "default_page_size")]
    pub page_size: usize,

    pub fields: Vec<FieldDef>,

    /// Ordering applied when the page is first shown
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_sort: Option<SortSpec>,

    /// Aggregate counters shown above the table
    #[serde(default)]
    pub stats: Vec<StatDef>,
}

impl ListSchema {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            page_size: DEFAULT_PAGE_SIZE,
            fields: Vec::new(),
            default_sort: None,
            stats: Vec::new(),
        }
    }

    pub fn with_field(mut self, field: FieldDef) -> Self {
        self.fields.push(field);
        self
    }

    pub fn with_stat(mut self, stat: StatDef) -> Self {
        self.stats.push(stat);
        self
    }

    pub fn with_default_sort(mut self, sort: SortSpec) -> Self {
        self.default_sort = Some(sort);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size;
        self
    }

    /// Find a field declaration by name
    pub fn field(&self, name: &str) -> Option<&FieldDef> {
        self.fields.iter().find(|f| f.name == name)
    }

    /// Declared kind of a field
    pub fn kind_of(&self, name: &str) -> Option<FieldKind> {
        self.field(name).map(|f| f.kind)
    }

    pub fn searchable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.searchable)
    }

    pub fn exportable_fields(&self) -> impl Iterator<Item = &FieldDef> {
        self.fields.iter().filter(|f| f.exportable)
    }

    /// Check the declarations are internally consistent
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.page_size == 0 {
            return Err(ConfigError::InvalidValue {
                field: format!("{}.page_size", self.name),
                value: "0".to_string(),
                message: "page size must be positive".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for field in &self.fields {
            if !seen.insert(field.name.as_str()) {
                return Err(ConfigError::DuplicateField {
                    list: self.name.clone(),
                    field: field.name.clone(),
                });
            }
        }

        if let Some(sort) = &self.default_sort {
            if !self.field(&sort.field).is_some_and(|f| f.sortable) {
                return Err(self.unknown_field(&sort.field, "default sort"));
            }
        }

        for stat in &self.stats {
            let context = format!("stat '{}'", stat.name);
            for field in stat.measure.referenced_fields() {
                if self.field(field).is_none() {
                    return Err(self.unknown_field(field, &context));
                }
            }
            if let Measure::Sum { field } | Measure::SumWhere { field, .. } = &stat.measure {
                if self.kind_of(field) != Some(FieldKind::Number) {
                    return Err(ConfigError::InvalidValue {
                        field: format!("{}.stats.{}", self.name, stat.name),
                        value: field.clone(),
                        message: "sums need a number field".to_string(),
                    });
                }
            }
        }

        Ok(())
    }

    fn unknown_field(&self, field: &str, context: &str) -> ConfigError {
        ConfigError::UnknownField {
            list: self.name.clone(),
            field: field.to_string(),
            context: context.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::filter::{FieldFilter, Filter};
    use crate::core::query::SortDirection;
    use serde_json::json;

    fn coupons() -> ListSchema {
        ListSchema::new("coupons")
            .with_field(FieldDef::text("code").searchable().sortable())
            .with_field(FieldDef::boolean("active").filterable())
            .with_field(FieldDef::number("usageCount").sortable())
            .with_field(FieldDef::date("createdAt").sortable().internal())
            .with_default_sort(SortSpec::new("createdAt", SortDirection::Desc))
    }

    #[test]
    fn test_builder_flags() {
        let schema = coupons();
        assert_eq!(schema.page_size, DEFAULT_PAGE_SIZE);
        assert_eq!(schema.searchable_fields().count(), 1);
        assert_eq!(schema.exportable_fields().count(), 3);
        assert_eq!(schema.kind_of("active"), Some(FieldKind::Boolean));
        assert!(schema.validate().is_ok());
    }

    #[test]
    fn test_nested_path_read() {
        let field = FieldDef::text("category").at("category.name").labeled("Category");
        let record = json!({"category": {"name": "Shoes"}});
        assert_eq!(field.read(&record), Some(FieldValue::from("Shoes")));
        assert_eq!(field.label(), "Category");
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let schema = coupons().with_field(FieldDef::text("code"));
        assert_eq!(
            schema.validate(),
            Err(ConfigError::DuplicateField {
                list: "coupons".into(),
                field: "code".into()
            })
        );
    }

    #[test]
    fn test_default_sort_must_be_sortable() {
        let schema = coupons().with_default_sort(SortSpec::new("active", SortDirection::Asc));
        assert!(matches!(
            schema.validate(),
            Err(ConfigError::UnknownField { .. })
        ));
    }

    #[test]
    fn test_stat_fields_must_exist() {
        let schema = coupons().with_stat(StatDef::new(
            "premium",
            Measure::CountWhere {
                when: vec![FieldFilter::new("tier", Filter::Equals("gold".into()))],
            },
        ));
        assert!(matches!(
            schema.validate(),
            Err(ConfigError::UnknownField { .. })
        ));

        let schema = coupons().with_stat(StatDef::new(
            "codes",
            Measure::Sum {
                field: "code".into(),
            },
        ));
        assert!(matches!(
            schema.validate(),
            Err(ConfigError::InvalidValue { .. })
        ));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        assert!(coupons().with_page_size(0).validate().is_err());
    }

    #[test]
    fn test_yaml_declaration() {
        let yaml = r#"
name: addresses
fields:
  - name: city
    kind: text
    searchable: true
    filterable: true
  - name: createdAt
    kind: date
    sortable: true
default_sort:
  field: createdAt
  direction: desc
stats:
  - name: uniqueCities
    kind: distinct
    field: city
"#;
        let schema: ListSchema = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(schema.page_size, 20);
        assert!(schema.fields[0].exportable);
        assert_eq!(schema.stats.len(), 1);
        assert!(schema.validate().is_ok());
    }
}
