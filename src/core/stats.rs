//! Aggregate counters over a full record collection
//!
//! Each list page shows a few numbers above its table ("active coupons",
//! "products in stock", "unique cities"). They are single-pass folds over the
//! unfiltered collection and ignore the current query.

use crate::core::field::{FieldKind, fold_case};
use crate::core::filter::FieldFilter;
use crate::core::record::Record;
use crate::core::schema::ListSchema;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// What a stat computes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Measure {
    /// Number of records
    Count,
    /// Number of records passing every condition
    CountWhere { when: Vec<FieldFilter> },
    /// Sum of a number field
    Sum { field: String },
    /// Sum of a number field over records passing every condition
    SumWhere { field: String, when: Vec<FieldFilter> },
    /// Number of distinct values of a field, compared case-insensitively
    Distinct { field: String },
}

impl Measure {
    /// Field names this measure reads
    pub fn referenced_fields(&self) -> Vec<&str> {
        match self {
            Measure::Count => Vec::new(),
            Measure::CountWhere { when } => when.iter().map(|c| c.field.as_str()).collect(),
            Measure::Sum { field } | Measure::Distinct { field } => vec![field.as_str()],
            Measure::SumWhere { field, when } => std::iter::once(field.as_str())
                .chain(when.iter().map(|c| c.field.as_str()))
                .collect(),
        }
    }
}

/// A named aggregate declared by a list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StatDef {
    pub name: String,
    #[serde(flatten)]
    pub measure: Measure,
}

impl StatDef {
    pub fn new(name: impl Into<String>, measure: Measure) -> Self {
        Self {
            name: name.into(),
            measure,
        }
    }
}

/// Result of one stat
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
#[serde(untagged)]
pub enum StatValue {
    Count(usize),
    Sum(f64),
}

/// Stat results in declaration order
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct Stats(IndexMap<String, StatValue>);

impl Stats {
    pub fn get(&self, name: &str) -> Option<StatValue> {
        self.0.get(name).copied()
    }

    /// Value of a counting stat
    pub fn count(&self, name: &str) -> Option<usize> {
        match self.get(name)? {
            StatValue::Count(n) => Some(n),
            StatValue::Sum(_) => None,
        }
    }

    /// Value of a summing stat
    pub fn sum(&self, name: &str) -> Option<f64> {
        match self.get(name)? {
            StatValue::Sum(s) => Some(s),
            StatValue::Count(_) => None,
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, StatValue)> {
        self.0.iter().map(|(k, v)| (k.as_str(), *v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Compute every stat declared by `schema` over `records`
pub fn derive_stats<R: Record>(schema: &ListSchema, records: &[R]) -> Stats {
    let values = schema
        .stats
        .iter()
        .map(|stat| (stat.name.clone(), measure(schema, &stat.measure, records)))
        .collect();
    Stats(values)
}

fn measure<R: Record>(schema: &ListSchema, measure: &Measure, records: &[R]) -> StatValue {
    match measure {
        Measure::Count => StatValue::Count(records.len()),
        Measure::CountWhere { when } => StatValue::Count(
            records
                .iter()
                .filter(|r| passes_all(schema, when, *r))
                .count(),
        ),
        Measure::Sum { field } => StatValue::Sum(
            records
                .iter()
                .filter_map(|r| number(schema, field, r))
                .sum(),
        ),
        Measure::SumWhere { field, when } => StatValue::Sum(
            records
                .iter()
                .filter(|r| passes_all(schema, when, *r))
                .filter_map(|r| number(schema, field, r))
                .sum(),
        ),
        Measure::Distinct { field } => {
            let path = schema.field(field).map_or(field.as_str(), |f| f.path());
            let distinct: HashSet<String> = records
                .iter()
                .filter_map(|r| r.field(path)?.display_text())
                .map(|text| fold_case(text.trim()))
                .filter(|text| !text.is_empty())
                .collect();
            StatValue::Count(distinct.len())
        }
    }
}

fn passes_all<R: Record>(schema: &ListSchema, conditions: &[FieldFilter], record: &R) -> bool {
    conditions.iter().all(|condition| {
        let def = schema.field(&condition.field);
        let path = def.map_or(condition.field.as_str(), |f| f.path());
        let value = record.field(path);
        let kind = def
            .map(|f| f.kind)
            .or_else(|| value.as_ref().map(FieldKind::infer))
            .unwrap_or(FieldKind::Text);
        condition.filter.matches(kind, value.as_ref())
    })
}

fn number<R: Record>(schema: &ListSchema, field: &str, record: &R) -> Option<f64> {
    let path = schema.field(field).map_or(field, |f| f.path());
    record.field(path)?.to_number()
}
