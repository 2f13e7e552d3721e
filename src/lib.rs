//! # listkit
//!
//! Schema-driven list management for admin consoles: search, filter, sort,
//! paginate and export in-memory record collections fetched from a REST API.
//!
//! ## Features
//!
//! - **Stateless Engine**: `ListQueryEngine` derives a fresh view from
//!   (records, query) on every call and never mutates its inputs
//! - **Declared Fields**: each list declares which fields are searchable,
//!   filterable, sortable and exportable, with typed comparisons
//! - **Stable Sorting**: equal keys keep their input order in both directions
//! - **Page Reset Rule**: changing search, filters or sort always lands on page 1
//! - **Aggregate Stats**: count, count-where, sum and distinct counters
//! - **CSV Export**: quoted, BOM-prefixed export of the whole matched view
//! - **Configuration-Based**: declare lists in code or in YAML
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use listkit::prelude::*;
//!
//! let schema = listkit::catalog::coupons();
//! let records: Vec<serde_json::Value> = fetch_coupons().await?;
//!
//! let query = QueryDescriptor::for_schema(&schema)
//!     .with_filter("active", Filter::Equals(true.into()))
//!     .with_filter("type", Filter::Equals("YUZDE".into()));
//!
//! let view = ListQueryEngine::new(&schema).run(&records, &query);
//! println!("{} of {} coupons", view.total_matched, view.total_unfiltered);
//! ```

pub mod catalog;
pub mod config;
pub mod console;
pub mod core;
pub mod storage;

/// Re-exports of commonly used types and traits
pub mod prelude {
    // === Core ===
    pub use crate::core::{
        engine::{ListQueryEngine, Page, paginate},
        error::{ConfigError, ExportError, ListError, SourceError},
        export::{export_csv, write_csv},
        field::{FieldKind, FieldValue},
        filter::{FieldFilter, Filter, FilterSet},
        query::{PaginationMeta, QueryDescriptor, QueryParams, SortDirection, SortSpec, ViewResult},
        record::Record,
        schema::{FieldDef, ListSchema},
        source::{
            ConfirmRequest, ConfirmationPrompt, DataSource, Notification, NotificationLevel,
            NotificationSink, SourceResult,
        },
        stats::{Measure, StatDef, StatValue, Stats},
    };

    // === Console ===
    pub use crate::console::{
        AutoConfirm, Debouncer, DeleteOutcome, ListController, ListStatus, LoadState,
        RecordingNotifier, TracingNotifier,
    };

    // === Storage ===
    #[cfg(feature = "in-memory")]
    pub use crate::storage::InMemoryDataSource;

    // === Config ===
    pub use crate::config::ConsoleConfig;

    // === External dependencies ===
    pub use anyhow::Result;
    pub use async_trait::async_trait;
    pub use serde::{Deserialize, Serialize};
}
