//! The caller side of the list engine
//!
//! A [`ListController`] is what one list page holds while it is mounted: the
//! last-known-good records, the current [`QueryDescriptor`] and the load
//! state. Views, stats and exports are recomputed from those on every call,
//! never cached. Mutations take `&mut self`, so at most one is in flight per
//! controller, and every successful mutation is followed by a full refetch.

use crate::config::ConsoleConfig;
use crate::core::engine::ListQueryEngine;
use crate::core::error::{ConfigError, ExportError, SourceError};
use crate::core::export;
use crate::core::filter::{Filter, FilterSet};
use crate::core::query::{PaginationMeta, QueryDescriptor, QueryParams, SortSpec, ViewResult};
use crate::core::record::Record;
use crate::core::schema::ListSchema;
use crate::core::source::{
    ConfirmRequest, ConfirmationPrompt, DataSource, Notification, NotificationSink, SourceResult,
};
use crate::core::stats::Stats;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

/// Default bound on a single data source call
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(15);

/// Where the record collection stands
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadState {
    /// Nothing fetched yet
    Idle,
    Loading,
    Loaded,
    /// The last fetch failed; records are the last-known-good collection
    Failed(String),
}

/// What the page should show
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListStatus {
    Loading,
    Failed(String),
    /// Loaded, but nothing matches the current query
    Empty,
    Ready,
}

/// Result of a delete request
#[derive(Debug, Clone, PartialEq)]
pub enum DeleteOutcome {
    /// The user declined; the data source was not called
    Cancelled,
    Deleted,
    Failed(SourceError),
}

/// Drives one list page: loads, query changes and confirmed mutations
pub struct ListController<R, S> {
    schema: Arc<ListSchema>,
    source: S,
    prompt: Arc<dyn ConfirmationPrompt>,
    notifier: Arc<dyn NotificationSink>,
    records: Vec<R>,
    query: QueryDescriptor,
    state: LoadState,
    timeout: Duration,
}

impl<R, S> ListController<R, S>
where
    R: Record + Send + 'static,
    S: DataSource<R>,
{
    pub fn new(
        schema: Arc<ListSchema>,
        source: S,
        prompt: Arc<dyn ConfirmationPrompt>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Self {
        let query = QueryDescriptor::for_schema(&schema);
        Self {
            schema,
            source,
            prompt,
            notifier,
            records: Vec::new(),
            query,
            state: LoadState::Idle,
            timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Controller for the configured list `name`, using the configured timeout
    pub fn from_config(
        config: &ConsoleConfig,
        name: &str,
        source: S,
        prompt: Arc<dyn ConfirmationPrompt>,
        notifier: Arc<dyn NotificationSink>,
    ) -> Result<Self, ConfigError> {
        let schema = Arc::new(config.require_list(name)?.clone());
        Ok(Self::new(schema, source, prompt, notifier).with_timeout(config.request_timeout()))
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn schema(&self) -> &ListSchema {
        &self.schema
    }

    pub fn query(&self) -> &QueryDescriptor {
        &self.query
    }

    /// The whole, unfiltered collection
    pub fn records(&self) -> &[R] {
        &self.records
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    fn engine(&self) -> ListQueryEngine<'_> {
        ListQueryEngine::new(&self.schema)
    }

    // =========================================================================
    // Derived output
    // =========================================================================

    /// The visible page for the current query
    pub fn view(&self) -> ViewResult<'_, R> {
        self.engine().run(&self.records, &self.query)
    }

    /// Aggregate counters over the whole collection
    pub fn stats(&self) -> Stats {
        self.engine().derive_stats(&self.records)
    }

    pub fn status(&self) -> ListStatus {
        match &self.state {
            LoadState::Idle | LoadState::Loading => ListStatus::Loading,
            LoadState::Failed(message) => ListStatus::Failed(message.clone()),
            LoadState::Loaded if self.engine().matched(&self.records, &self.query).is_empty() => {
                ListStatus::Empty
            }
            LoadState::Loaded => ListStatus::Ready,
        }
    }

    /// CSV of every record matching the current query, across all pages
    pub fn export_csv(&self) -> Result<String, ExportError> {
        let matched = self.engine().matched(&self.records, &self.query);
        export::export_csv(&self.schema, matched)
    }

    // =========================================================================
    // Query changes
    // =========================================================================

    fn update_query(&mut self, change: impl FnOnce(QueryDescriptor) -> QueryDescriptor) {
        let query = std::mem::take(&mut self.query);
        self.query = change(query);
        tracing::debug!(
            list = %self.schema.name,
            search = self.query.search_text(),
            page = self.query.page(),
            "Query changed"
        );
    }

    /// Pull the page back into range after the matched set shrank
    fn clamp_page(&mut self) {
        let matched = self.engine().matched(&self.records, &self.query).len();
        let meta = PaginationMeta::new(self.query.page(), self.query.page_size(), matched);
        if meta.page != self.query.page() {
            self.update_query(|q| q.with_page(meta.page));
        }
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.update_query(|q| q.with_search(text));
    }

    pub fn set_filter(&mut self, field: &str, filter: Filter) {
        self.update_query(|q| q.with_filter(field, filter));
    }

    pub fn set_filters(&mut self, filters: FilterSet) {
        self.update_query(|q| q.with_filters(filters));
    }

    pub fn remove_filter(&mut self, field: &str) {
        self.update_query(|q| q.without_filter(field));
    }

    pub fn clear_filters(&mut self) {
        self.update_query(QueryDescriptor::clear_filters);
    }

    /// Header click: same field flips direction, a new field sorts ascending
    pub fn toggle_sort(&mut self, field: &str) {
        self.update_query(|q| q.toggle_sort(field));
    }

    pub fn set_sort(&mut self, sort: Option<SortSpec>) {
        self.update_query(|q| q.with_sort(sort));
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        self.update_query(|q| q.with_page_size(page_size));
    }

    /// Jump to a page, clamped to the pages that exist
    pub fn go_to_page(&mut self, page: usize) {
        self.update_query(|q| q.with_page(page));
        self.clamp_page();
    }

    pub fn next_page(&mut self) {
        self.update_query(QueryDescriptor::next_page);
        self.clamp_page();
    }

    pub fn prev_page(&mut self) {
        self.update_query(QueryDescriptor::prev_page);
    }

    /// Replace the whole query with one decoded from a query string
    pub fn apply_params(&mut self, params: &QueryParams) {
        let query = params.to_descriptor(&self.schema);
        self.update_query(|_| query);
        self.clamp_page();
    }

    /// Back to the query the page starts with
    pub fn reset_query(&mut self) {
        let query = QueryDescriptor::for_schema(&self.schema);
        self.update_query(|_| query);
    }

    // =========================================================================
    // Data source calls
    // =========================================================================

    async fn call<T>(
        &self,
        operation: &str,
        request: impl Future<Output = SourceResult<T>>,
    ) -> SourceResult<T> {
        match tokio::time::timeout(self.timeout, request).await {
            Ok(result) => result,
            Err(_) => Err(SourceError::Timeout {
                operation: operation.to_string(),
                after: self.timeout,
            }),
        }
    }

    /// Fetch the collection and replace the records wholesale.
    ///
    /// On failure the previous records stay in place, the state becomes
    /// [`LoadState::Failed`] and the user is notified.
    pub async fn load(&mut self) -> SourceResult<usize> {
        self.state = LoadState::Loading;

        match self.call("fetch", self.source.fetch_all()).await {
            Ok(records) => {
                let count = records.len();
                self.records = records;
                self.state = LoadState::Loaded;
                self.clamp_page();
                tracing::info!(list = %self.schema.name, count, "Loaded records");
                Ok(count)
            }
            Err(e) => {
                tracing::warn!(
                    list = %self.schema.name,
                    error = %e,
                    code = e.error_code(),
                    kept = self.records.len(),
                    "Failed to load records"
                );
                self.state = LoadState::Failed(e.to_string());
                self.notifier.notify(Notification::error(format!(
                    "Could not load {}: {}",
                    self.schema.name, e
                )));
                Err(e)
            }
        }
    }

    /// Refetch after a mutation; `load` reports its own failure
    async fn refresh(&mut self) {
        let _ = self.load().await;
    }

    pub async fn create(&mut self, record: R) -> SourceResult<R> {
        match self.call("create", self.source.create(record)).await {
            Ok(created) => {
                let id = created.id().unwrap_or_default();
                tracing::info!(list = %self.schema.name, id = %id, "Created record");
                self.notifier
                    .notify(Notification::success(format!("Record {id} created")));
                self.refresh().await;
                Ok(created)
            }
            Err(e) => Err(self.mutation_failed("create", e)),
        }
    }

    pub async fn update(&mut self, id: &str, record: R) -> SourceResult<R> {
        match self.call("update", self.source.update(id, record)).await {
            Ok(updated) => {
                tracing::info!(list = %self.schema.name, id, "Updated record");
                self.notifier
                    .notify(Notification::success(format!("Record {id} updated")));
                self.refresh().await;
                Ok(updated)
            }
            Err(e) => Err(self.mutation_failed("update", e)),
        }
    }

    /// Delete after the user confirms.
    ///
    /// `label` names the record in the confirmation and notifications.
    pub async fn delete(&mut self, id: &str, label: &str) -> DeleteOutcome {
        let request = ConfirmRequest::new(
            "Confirm deletion",
            format!("Delete {label}? This cannot be undone."),
        );
        if !self.prompt.confirm(&request).await {
            tracing::debug!(list = %self.schema.name, id, "Deletion cancelled");
            return DeleteOutcome::Cancelled;
        }

        match self.call("delete", self.source.delete(id)).await {
            Ok(()) => {
                tracing::info!(list = %self.schema.name, id, "Deleted record");
                self.notifier
                    .notify(Notification::success(format!("{label} deleted")));
                self.refresh().await;
                DeleteOutcome::Deleted
            }
            Err(e) => DeleteOutcome::Failed(self.mutation_failed("delete", e)),
        }
    }

    fn mutation_failed(&self, operation: &str, error: SourceError) -> SourceError {
        tracing::warn!(
            list = %self.schema.name,
            operation,
            error = %error,
            code = error.error_code(),
            "Mutation failed"
        );
        self.notifier
            .notify(Notification::error(format!("Could not {operation}: {error}")));
        error
    }
}
