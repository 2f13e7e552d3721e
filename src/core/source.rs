//! Collaborator traits around the engine
//!
//! The engine is pure; everything with side effects sits behind these traits:
//! fetching and mutating records, asking the user before destructive actions,
//! and telling the user how an action went.

use crate::core::error::SourceError;
use async_trait::async_trait;
use serde::Serialize;

pub type SourceResult<T> = Result<T, SourceError>;

/// Remote collection of records of one type
///
/// Implementations talk to the backing API. Calls are request/response: the
/// caller only sees the final collection or an error. Nothing here retries.
#[async_trait]
pub trait DataSource<R>: Send + Sync
where
    R: Send + 'static,
{
    /// Fetch the whole collection
    async fn fetch_all(&self) -> SourceResult<Vec<R>>;

    /// Create a record, returning it as stored
    async fn create(&self, record: R) -> SourceResult<R>;

    /// Replace the record identified by `id`
    async fn update(&self, id: &str, record: R) -> SourceResult<R>;

    /// Delete the record identified by `id`
    async fn delete(&self, id: &str) -> SourceResult<()>;
}

/// Question put to the user before a destructive action
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ConfirmRequest {
    pub title: String,
    pub message: String,
}

impl ConfirmRequest {
    pub fn new(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// Asks the user to confirm a destructive action
#[async_trait]
pub trait ConfirmationPrompt: Send + Sync {
    /// `true` when the user agreed
    async fn confirm(&self, request: &ConfirmRequest) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationLevel {
    Success,
    Info,
    Error,
}

/// A message surfaced to the user (toast, status line, log)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Notification {
    pub level: NotificationLevel,
    pub message: String,
}

impl Notification {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Success,
            message: message.into(),
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NotificationLevel::Error,
            message: message.into(),
        }
    }
}

/// Receives user-facing notifications
pub trait NotificationSink: Send + Sync {
    fn notify(&self, notification: Notification);
}
