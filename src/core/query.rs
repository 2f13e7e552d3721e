//! Query descriptors, query-string parameters and paginated views

use crate::core::filter::{Filter, FilterSet};
use crate::core::schema::{DEFAULT_PAGE_SIZE, ListSchema};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Sort direction of a list column
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            SortDirection::Asc => SortDirection::Desc,
            SortDirection::Desc => SortDirection::Asc,
        }
    }
}

/// Field and direction to order a list by
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    pub field: String,
    #[serde(default)]
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    pub fn asc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Asc)
    }

    pub fn desc(field: impl Into<String>) -> Self {
        Self::new(field, SortDirection::Desc)
    }

    /// Parse `field`, `field:asc` or `field:desc`.
    ///
    /// Returns `None` for an empty field or an unknown direction.
    pub fn parse(text: &str) -> Option<Self> {
        let (field, direction) = match text.trim().split_once(':') {
            Some((field, "asc")) => (field, SortDirection::Asc),
            Some((field, "desc")) => (field, SortDirection::Desc),
            Some(_) => return None,
            None => (text.trim(), SortDirection::Asc),
        };
        let field = field.trim();
        (!field.is_empty()).then(|| Self::new(field, direction))
    }
}

impl fmt::Display for SortSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let direction = match self.direction {
            SortDirection::Asc => "asc",
            SortDirection::Desc => "desc",
        };
        write!(f, "{}:{}", self.field, direction)
    }
}

/// Complete description of how to derive a view from a record collection.
///
/// Descriptors are values: every transition returns a new one. Changing the
/// search text, the filters, the sort or the page size always lands on page 1;
/// only the page transitions keep everything else.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QueryDescriptor {
    search_text: String,
    filters: FilterSet,
    sort: Option<SortSpec>,
    page: usize,
    page_size: usize,
}

impl Default for QueryDescriptor {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl QueryDescriptor {
    /// Empty query on page 1
    pub fn new(page_size: usize) -> Self {
        Self {
            search_text: String::new(),
            filters: FilterSet::default(),
            sort: None,
            page: 1,
            page_size: page_size.max(1),
        }
    }

    /// The query a list page starts from
    pub fn for_schema(schema: &ListSchema) -> Self {
        Self {
            sort: schema.default_sort.clone(),
            ..Self::new(schema.page_size)
        }
    }

    pub fn search_text(&self) -> &str {
        &self.search_text
    }

    pub fn filters(&self) -> &FilterSet {
        &self.filters
    }

    pub fn sort(&self) -> Option<&SortSpec> {
        self.sort.as_ref()
    }

    pub fn page(&self) -> usize {
        self.page
    }

    pub fn page_size(&self) -> usize {
        self.page_size
    }

    pub fn with_search(self, text: impl Into<String>) -> Self {
        Self {
            search_text: text.into(),
            page: 1,
            ..self
        }
    }

    /// Replace the filters on `field`
    pub fn with_filter(mut self, field: &str, filter: Filter) -> Self {
        self.filters.set(field, filter);
        self.page = 1;
        self
    }

    pub fn without_filter(mut self, field: &str) -> Self {
        self.filters.remove(field);
        self.page = 1;
        self
    }

    pub fn with_filters(self, filters: FilterSet) -> Self {
        Self {
            filters,
            page: 1,
            ..self
        }
    }

    pub fn clear_filters(self) -> Self {
        self.with_filters(FilterSet::default())
    }

    pub fn with_sort(self, sort: Option<SortSpec>) -> Self {
        Self {
            sort,
            page: 1,
            ..self
        }
    }

    /// Column-header click: the current column flips direction, a new column
    /// starts ascending.
    pub fn toggle_sort(self, field: &str) -> Self {
        let sort = match &self.sort {
            Some(current) if current.field == field => {
                SortSpec::new(field, current.direction.toggled())
            }
            _ => SortSpec::asc(field),
        };
        self.with_sort(Some(sort))
    }

    pub fn with_page_size(self, page_size: usize) -> Self {
        Self {
            page_size: page_size.max(1),
            page: 1,
            ..self
        }
    }

    /// Move to a page; 0 is read as page 1
    pub fn with_page(self, page: usize) -> Self {
        Self {
            page: page.max(1),
            ..self
        }
    }

    pub fn next_page(self) -> Self {
        let page = self.page.saturating_add(1);
        self.with_page(page)
    }

    pub fn prev_page(self) -> Self {
        let page = self.page.saturating_sub(1);
        self.with_page(page)
    }
}

/// Query parameters for pagination and filtering
///
/// This structure is used to extract list parameters from URL query strings.
///
/// # Example
/// ```text
/// GET /coupons?page=2&limit=10
/// GET /coupons?q=spring&filter={"active": true}
/// GET /products?page=1&limit=20&filter={"price>": 100}&sort=createdAt:desc
/// ```
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct QueryParams {
    /// Page number (starts at 1)
    pub page: Option<usize>,

    /// Number of items per page
    pub limit: Option<usize>,

    /// Free-text search
    pub q: Option<String>,

    /// Filters as JSON object
    ///
    /// # Format
    /// - Exact match: `{"field": "value"}`
    /// - One of: `{"field": ["a", "b"]}`
    /// - Comparison: `{"field>": value, "field<": value, "field>=": value, "field<=": value}`
    pub filter: Option<String>,

    /// Sort field and direction (`field`, `field:asc` or `field:desc`)
    pub sort: Option<String>,
}

/// Largest page size a query string may ask for
pub const MAX_LIMIT: usize = 100;

impl QueryParams {
    /// Get page number, ensuring minimum of 1
    pub fn page(&self) -> usize {
        self.page.unwrap_or(1).max(1)
    }

    /// Get limit, falling back to `default` and clamped to 1..=100
    pub fn limit(&self, default: usize) -> usize {
        self.limit.unwrap_or(default).clamp(1, MAX_LIMIT)
    }

    /// Parse filter JSON string into Value; malformed JSON is ignored
    pub fn filter_value(&self) -> Option<Value> {
        self.filter
            .as_ref()
            .and_then(|s| serde_json::from_str(s).ok())
    }

    /// Build the descriptor for `schema`, keeping its default sort when the
    /// query string does not name one
    pub fn to_descriptor(&self, schema: &ListSchema) -> QueryDescriptor {
        let filters = self
            .filter_value()
            .map(|v| FilterSet::from_query_json(&v))
            .unwrap_or_default();
        let sort = match self.sort.as_deref() {
            Some(text) => SortSpec::parse(text),
            None => schema.default_sort.clone(),
        };

        QueryDescriptor::new(self.limit(schema.page_size))
            .with_search(self.q.clone().unwrap_or_default())
            .with_filters(filters)
            .with_sort(sort)
            .with_page(self.page())
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PaginationMeta {
    /// Effective page number (starts at 1)
    pub page: usize,

    /// Number of items per page
    pub page_size: usize,

    /// Total number of pages, at least 1
    pub total_pages: usize,

    /// Whether there is a next page
    pub has_next: bool,

    /// Whether there is a previous page
    pub has_prev: bool,
}

impl PaginationMeta {
    /// Pagination for `total` items, clamping the requested page into range
    pub fn new(page: usize, page_size: usize, total: usize) -> Self {
        // Ensure page size is at least 1 to avoid division by zero
        let page_size = page_size.max(1);
        let total_pages = total.div_ceil(page_size).max(1);
        let page = page.clamp(1, total_pages);

        Self {
            page,
            page_size,
            total_pages,
            has_next: page < total_pages,
            has_prev: page > 1,
        }
    }

    /// Index range of the current page within the full list
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let start = ((self.page - 1) * self.page_size).min(total);
        let end = (start + self.page_size).min(total);
        start..end
    }
}

/// The derived, never-persisted output of running a query over records
#[derive(Debug, Serialize)]
pub struct ViewResult<'a, R> {
    /// Records of the current page, in query order
    pub records: Vec<&'a R>,

    /// Records passing search and filters, before pagination
    pub total_matched: usize,

    /// Records in the source collection
    pub total_unfiltered: usize,

    #[serde(flatten)]
    pub pagination: PaginationMeta,
}

impl<R> ViewResult<'_, R> {
    pub fn page(&self) -> usize {
        self.pagination.page
    }

    pub fn total_pages(&self) -> usize {
        self.pagination.total_pages
    }

    /// True when nothing matched the query
    pub fn is_empty(&self) -> bool {
        self.total_matched == 0
    }
}
