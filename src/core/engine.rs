//! The list query pipeline: search, filter, sort, paginate
//!
//! [`ListQueryEngine`] is stateless. Every call derives a fresh result from
//! the records and the query it is handed and never mutates either, so the
//! same engine can serve any number of concurrent callers.
//!
//! # Example
//!
//! ```rust,ignore
//! let schema = listkit::catalog::coupons();
//! let engine = ListQueryEngine::new(&schema);
//! let query = QueryDescriptor::for_schema(&schema)
//!     .with_search("spring")
//!     .with_filter("active", Filter::Equals(true.into()));
//!
//! let view = engine.run(&records, &query);
//! println!("{} / {}", view.total_matched, view.total_unfiltered);
//! ```

use crate::core::field::{FieldKey, compare_keys, fold_case};
use crate::core::filter::{Filter, FilterSet};
use crate::core::query::{PaginationMeta, QueryDescriptor, SortDirection, SortSpec, ViewResult};
use crate::core::record::Record;
use crate::core::schema::{FieldDef, ListSchema};
use crate::core::stats::{Stats, derive_stats};

/// A page cut out of an ordered list
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub meta: PaginationMeta,
}

/// Cut page `page` (1-based, clamped) of `page_size` items out of `items`
pub fn paginate<T>(items: Vec<T>, page: usize, page_size: usize) -> Page<T> {
    let total = items.len();
    let meta = PaginationMeta::new(page, page_size, total);
    let range = meta.range(total);
    let items = items
        .into_iter()
        .skip(range.start)
        .take(range.len())
        .collect();
    Page { items, meta }
}

/// Schema-driven search/filter/sort/paginate pipeline
#[derive(Debug, Clone, Copy)]
pub struct ListQueryEngine<'s> {
    schema: &'s ListSchema,
}

impl<'s> ListQueryEngine<'s> {
    pub fn new(schema: &'s ListSchema) -> Self {
        Self { schema }
    }

    pub fn schema(&self) -> &'s ListSchema {
        self.schema
    }

    /// Keep records whose searchable fields contain `text`, ignoring case.
    ///
    /// The text is trimmed first; an empty text keeps everything. Absent
    /// fields never match. Input order is preserved.
    pub fn search<'a, R, I>(&self, records: I, text: &str) -> Vec<&'a R>
    where
        R: Record + 'a,
        I: IntoIterator<Item = &'a R>,
    {
        let needle = fold_case(text.trim());
        if needle.is_empty() {
            return records.into_iter().collect();
        }

        let fields: Vec<&FieldDef> = self.schema.searchable_fields().collect();
        records
            .into_iter()
            .filter(|record| {
                fields.iter().any(|field| {
                    field
                        .read(*record)
                        .and_then(|value| value.display_text())
                        .is_some_and(|text| fold_case(&text).contains(&needle))
                })
            })
            .collect()
    }

    /// Keep records passing every active filter on a filterable field.
    ///
    /// Filters naming undeclared or non-filterable fields are ignored.
    pub fn apply_filters<'a, R: Record>(
        &self,
        candidates: Vec<&'a R>,
        filters: &FilterSet,
    ) -> Vec<&'a R> {
        let active: Vec<(&FieldDef, &Filter)> = filters
            .active()
            .filter_map(|f| match self.schema.field(&f.field) {
                Some(def) if def.filterable => Some((def, &f.filter)),
                _ => {
                    tracing::debug!(
                        list = %self.schema.name,
                        field = %f.field,
                        "Ignoring filter on a field that is not filterable"
                    );
                    None
                }
            })
            .collect();

        if active.is_empty() {
            return candidates;
        }

        candidates
            .into_iter()
            .filter(|record| {
                active
                    .iter()
                    .all(|(def, filter)| filter.matches(def.kind, def.read(*record).as_ref()))
            })
            .collect()
    }

    /// Order records by a sortable field with a stable sort.
    ///
    /// Missing or uncoercible values come first in ascending order and last
    /// in descending order. Equal keys keep their input order in both
    /// directions. Without a sort, or for an unknown field, input order is
    /// kept.
    pub fn sort<'a, R: Record>(&self, items: Vec<&'a R>, sort: Option<&SortSpec>) -> Vec<&'a R> {
        let Some(sort) = sort else {
            return items;
        };
        let Some(def) = self.schema.field(&sort.field).filter(|f| f.sortable) else {
            tracing::debug!(
                list = %self.schema.name,
                field = %sort.field,
                "Unknown sort field, keeping input order"
            );
            return items;
        };

        let mut keyed: Vec<(Option<FieldKey>, &'a R)> = items
            .into_iter()
            .map(|record| (def.read(record).and_then(|v| def.kind.key(&v)), record))
            .collect();

        // slice::sort_by is stable
        match sort.direction {
            SortDirection::Asc => keyed.sort_by(|a, b| compare_keys(a.0.as_ref(), b.0.as_ref())),
            SortDirection::Desc => {
                keyed.sort_by(|a, b| compare_keys(b.0.as_ref(), a.0.as_ref()))
            }
        }

        keyed.into_iter().map(|(_, record)| record).collect()
    }

    /// Search, filter and sort without paginating.
    ///
    /// This is the list a CSV export writes out.
    pub fn matched<'a, R: Record>(
        &self,
        records: &'a [R],
        query: &QueryDescriptor,
    ) -> Vec<&'a R> {
        let candidates = self.search(records, query.search_text());
        let filtered = self.apply_filters(candidates, query.filters());
        self.sort(filtered, query.sort())
    }

    /// Derive the visible page for `query`
    pub fn run<'a, R: Record>(
        &self,
        records: &'a [R],
        query: &QueryDescriptor,
    ) -> ViewResult<'a, R> {
        let ordered = self.matched(records, query);
        let total_matched = ordered.len();
        let page = paginate(ordered, query.page(), query.page_size());

        tracing::debug!(
            list = %self.schema.name,
            total = records.len(),
            matched = total_matched,
            page = page.meta.page,
            "Derived list view"
        );

        ViewResult {
            records: page.items,
            total_matched,
            total_unfiltered: records.len(),
            pagination: page.meta,
        }
    }

    /// Aggregate counters over the whole, unfiltered collection
    pub fn derive_stats<R: Record>(&self, records: &[R]) -> Stats {
        derive_stats(self.schema, records)
    }
}
