//! Console configuration loading and management

use crate::console::DEFAULT_REQUEST_TIMEOUT;
use crate::core::error::ConfigError;
use crate::core::schema::ListSchema;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::time::Duration;

/// Quiet period used when no configuration sets one
pub const DEFAULT_SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);

/// Settings shared by every list page, plus the list declarations
///
/// Timings left out of a file stay `None`, so merging a lists-only override
/// keeps the timings of earlier configurations.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ConsoleConfig {
    /// Quiet period before a typed search is applied (default 300 ms)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_debounce_ms: Option<u64>,

    /// Upper bound on every data source call (default 15 s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub request_timeout_ms: Option<u64>,

    /// List declarations, one per record type
    #[serde(default)]
    pub lists: Vec<ListSchema>,
}

impl ConsoleConfig {
    /// Load configuration from a YAML file
    pub fn from_yaml_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config = Self::from_yaml_str(&content)?;
        tracing::info!(path, lists = config.lists.len(), "Loaded console configuration");
        Ok(config)
    }

    /// Load configuration from a YAML string
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        let config: Self = serde_yaml::from_str(yaml)?;
        config.validate()?;
        Ok(config)
    }

    /// Check timeouts and every list declaration
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.request_timeout_ms == Some(0) {
            return Err(ConfigError::InvalidValue {
                field: "request_timeout_ms".to_string(),
                value: "0".to_string(),
                message: "timeout must be positive".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for list in &self.lists {
            if !seen.insert(list.name.as_str()) {
                return Err(ConfigError::DuplicateList {
                    list: list.name.clone(),
                });
            }
            list.validate()?;
        }
        Ok(())
    }

    /// Merge several configurations.
    ///
    /// Later configurations win: timings they set replace earlier ones and a
    /// list with an already-seen name replaces the earlier declaration in place.
    pub fn merge(configs: Vec<Self>) -> Self {
        let mut merged = Self::default();

        for config in configs {
            if config.search_debounce_ms.is_some() {
                merged.search_debounce_ms = config.search_debounce_ms;
            }
            if config.request_timeout_ms.is_some() {
                merged.request_timeout_ms = config.request_timeout_ms;
            }

            for list in config.lists {
                match merged.lists.iter_mut().find(|l| l.name == list.name) {
                    Some(existing) => *existing = list,
                    None => merged.lists.push(list),
                }
            }
        }

        merged
    }

    /// Find a list declaration by name
    pub fn list(&self, name: &str) -> Option<&ListSchema> {
        self.lists.iter().find(|l| l.name == name)
    }

    /// Find a list declaration, failing for unknown names
    pub fn require_list(&self, name: &str) -> Result<&ListSchema, ConfigError> {
        self.list(name).ok_or_else(|| ConfigError::UnknownList {
            list: name.to_string(),
        })
    }

    pub fn search_debounce(&self) -> Duration {
        self.search_debounce_ms.map_or(DEFAULT_SEARCH_DEBOUNCE, Duration::from_millis)
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout_ms.map_or(DEFAULT_REQUEST_TIMEOUT, Duration::from_millis)
    }

    /// Configuration with every list of the admin console
    pub fn default_config() -> Self {
        Self {
            lists: crate::catalog::all(),
            ..Self::default()
        }
    }
}
