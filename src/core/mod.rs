//! Core module containing the query engine and the types it works on

pub mod engine;
pub mod error;
pub mod export;
pub mod field;
pub mod filter;
pub mod query;
pub mod record;
pub mod schema;
pub mod source;
pub mod stats;

pub use engine::{ListQueryEngine, Page, paginate};
pub use error::{ConfigError, ExportError, ListError, SourceError};
pub use field::{FieldKind, FieldValue};
pub use filter::{FieldFilter, Filter, FilterSet};
pub use query::{PaginationMeta, QueryDescriptor, QueryParams, SortDirection, SortSpec, ViewResult};
pub use record::Record;
pub use schema::{FieldDef, ListSchema};
pub use source::{
    ConfirmRequest, ConfirmationPrompt, DataSource, Notification, NotificationLevel,
    NotificationSink, SourceResult,
};
pub use stats::{Measure, StatDef, StatValue, Stats};
