//! In-memory implementation of DataSource for testing and development

use crate::core::error::SourceError;
use crate::core::record::Record;
use crate::core::source::{DataSource, SourceResult};
use async_trait::async_trait;
use indexmap::IndexMap;
use serde_json::Value;
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};
use uuid::Uuid;

/// In-memory data source keyed by record id
///
/// Useful for testing and development. Records are returned in insertion
/// order, which is the order the list engine keeps for unsorted views.
/// Clones share the same storage.
#[derive(Clone)]
pub struct InMemoryDataSource<R> {
    records: Arc<RwLock<IndexMap<String, R>>>,
    assign_id: Option<fn(&mut R, &str)>,
}

impl<R> InMemoryDataSource<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    /// Create an empty data source
    pub fn new() -> Self {
        Self {
            records: Arc::new(RwLock::new(IndexMap::new())),
            assign_id: None,
        }
    }

    /// Create a data source holding `records`.
    ///
    /// Records without an id are skipped; a repeated id keeps the last record
    /// in the position of the first.
    pub fn with_records(records: impl IntoIterator<Item = R>) -> Self {
        let map = records
            .into_iter()
            .filter_map(|record| record.id().map(|id| (id, record)))
            .collect();
        Self {
            records: Arc::new(RwLock::new(map)),
            assign_id: None,
        }
    }

    /// Number of stored records
    pub fn len(&self) -> usize {
        self.read().map(|records| records.len()).unwrap_or(0)
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn read(&self) -> SourceResult<RwLockReadGuard<'_, IndexMap<String, R>>> {
        self.records.read().map_err(|e| SourceError::Unavailable {
            message: format!("Failed to acquire read lock: {}", e),
        })
    }

    fn write(&self) -> SourceResult<RwLockWriteGuard<'_, IndexMap<String, R>>> {
        self.records.write().map_err(|e| SourceError::Unavailable {
            message: format!("Failed to acquire write lock: {}", e),
        })
    }
}

impl InMemoryDataSource<Value> {
    /// Give created JSON records without an `id` a fresh UUID
    pub fn generating_ids(mut self) -> Self {
        self.assign_id = Some(set_json_id);
        self
    }
}

fn set_json_id(record: &mut Value, id: &str) {
    if let Value::Object(map) = record {
        map.insert("id".to_string(), Value::String(id.to_string()));
    }
}

impl<R> Default for InMemoryDataSource<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R> DataSource<R> for InMemoryDataSource<R>
where
    R: Record + Clone + Send + Sync + 'static,
{
    async fn fetch_all(&self) -> SourceResult<Vec<R>> {
        let records = self.read()?;
        Ok(records.values().cloned().collect())
    }

    async fn create(&self, mut record: R) -> SourceResult<R> {
        let id = match (record.id(), self.assign_id) {
            (Some(id), _) => id,
            (None, Some(assign)) => {
                let id = Uuid::new_v4().to_string();
                assign(&mut record, &id);
                id
            }
            (None, None) => {
                return Err(SourceError::MalformedPayload {
                    message: "record has no id".to_string(),
                });
            }
        };

        let mut records = self.write()?;
        if records.contains_key(&id) {
            return Err(SourceError::Conflict { id });
        }
        records.insert(id, record.clone());

        Ok(record)
    }

    async fn update(&self, id: &str, record: R) -> SourceResult<R> {
        // The stored key and the record's own id must stay in step
        if record.id().is_some_and(|own| own != id) {
            return Err(SourceError::Conflict { id: id.to_string() });
        }

        let mut records = self.write()?;

        let slot = records.get_mut(id).ok_or_else(|| SourceError::NotFound {
            id: id.to_string(),
        })?;
        *slot = record.clone();

        Ok(record)
    }

    async fn delete(&self, id: &str) -> SourceResult<()> {
        let mut records = self.write()?;

        // shift_remove keeps the remaining records in insertion order
        records
            .shift_remove(id)
            .map(|_| ())
            .ok_or_else(|| SourceError::NotFound { id: id.to_string() })
    }
}
