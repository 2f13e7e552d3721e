//! Typed error handling for listkit
//!
//! The query engine itself never fails: malformed fields are skipped, empty
//! results are a normal view and out-of-range pages are clamped. Errors only
//! come from the edges.
//!
//! # Error Categories
//!
//! - [`SourceError`]: a data source call failed (network, status, payload, timeout)
//! - [`ConfigError`]: a list schema or console configuration is invalid
//! - [`ExportError`]: writing the CSV export failed
//!
//! # Example
//!
//! ```rust,ignore
//! match controller.load().await {
//!     Ok(count) => println!("loaded {count} records"),
//!     Err(SourceError::Timeout { after, .. }) => println!("gave up after {after:?}"),
//!     Err(e) => eprintln!("{} ({})", e, e.error_code()),
//! }
//! ```

use std::time::Duration;
use thiserror::Error;

/// The main error type for listkit
#[derive(Debug, Error)]
pub enum ListError {
    /// Data source errors
    #[error(transparent)]
    Source(#[from] SourceError),

    /// Configuration errors
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// CSV export errors
    #[error(transparent)]
    Export(#[from] ExportError),
}

impl ListError {
    /// Get the error code for this error
    pub fn error_code(&self) -> &'static str {
        match self {
            ListError::Source(e) => e.error_code(),
            ListError::Config(_) => "CONFIG_ERROR",
            ListError::Export(_) => "EXPORT_ERROR",
        }
    }
}

// =============================================================================
// Source Errors
// =============================================================================

/// Failures reported by a [`DataSource`](crate::core::source::DataSource).
///
/// The `Display` text is meant to be shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    /// The request never got a response
    #[error("Network error: {message}")]
    Network { message: String },

    /// The API answered with a non-2xx status
    #[error("Server responded with status {code}: {message}")]
    Status { code: u16, message: String },

    /// The response body could not be decoded
    #[error("Malformed response: {message}")]
    MalformedPayload { message: String },

    /// The targeted record does not exist
    #[error("Record '{id}' not found")]
    NotFound { id: String },

    /// A record with the same identifier already exists
    #[error("Record '{id}' already exists")]
    Conflict { id: String },

    /// The call did not complete within the configured timeout
    #[error("{operation} timed out after {}ms", .after.as_millis())]
    Timeout { operation: String, after: Duration },

    /// The backend cannot serve requests right now
    #[error("Data source unavailable: {message}")]
    Unavailable { message: String },
}

impl SourceError {
    pub fn error_code(&self) -> &'static str {
        match self {
            SourceError::Network { .. } => "NETWORK_ERROR",
            SourceError::Status { .. } => "HTTP_STATUS_ERROR",
            SourceError::MalformedPayload { .. } => "MALFORMED_PAYLOAD",
            SourceError::NotFound { .. } => "RECORD_NOT_FOUND",
            SourceError::Conflict { .. } => "RECORD_CONFLICT",
            SourceError::Timeout { .. } => "TIMEOUT",
            SourceError::Unavailable { .. } => "SOURCE_UNAVAILABLE",
        }
    }
}

// =============================================================================
// Config Errors
// =============================================================================

/// Errors related to list schemas and console configuration
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A field name is declared twice in one list
    #[error("Duplicate field '{field}' in list '{list}'")]
    DuplicateField { list: String, field: String },

    /// A list name is declared twice
    #[error("Duplicate list '{list}'")]
    DuplicateList { list: String },

    /// A sort or stat refers to a field the list does not declare
    #[error("Unknown field '{field}' referenced by {context} in list '{list}'")]
    UnknownField {
        list: String,
        field: String,
        context: String,
    },

    /// Invalid value in configuration
    #[error("Invalid value '{value}' for '{field}': {message}")]
    InvalidValue {
        field: String,
        value: String,
        message: String,
    },

    /// No list with this name is configured
    #[error("Unknown list: {list}")]
    UnknownList { list: String },
}

// =============================================================================
// Export Errors
// =============================================================================

/// Errors raised while writing a CSV export
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("CSV write failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Export is not valid UTF-8: {0}")]
    Encoding(#[from] std::string::FromUtf8Error),
}
