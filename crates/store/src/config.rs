//! Store configuration passed into every pipeline invocation.

use serde::{Deserialize, Serialize};

use crate::errors::StoreError;

/// Table targeted when `SEED_TABLE` is not set.
pub const DEFAULT_TABLE: &str = "exam_registry_stg";

/// Target table and endpoint for one run.
///
/// Credentials come from the SDK's default provider chain (environment,
/// shared profile, instance role); only the table name and an optional
/// local endpoint override live here.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Table name.
    pub table: String,

    /// Endpoint override, for local store instances.
    pub endpoint_url: Option<String>,
}

impl StoreConfig {
    pub fn new(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            endpoint_url: None,
        }
    }

    pub fn with_endpoint_url(mut self, url: impl Into<String>) -> Self {
        self.endpoint_url = Some(url.into());
        self
    }

    /// Reads the configuration from `SEED_TABLE` and `SEED_ENDPOINT_URL`,
    /// falling back to [`DEFAULT_TABLE`].
    pub fn from_env() -> Result<Self, StoreError> {
        let table = std::env::var("SEED_TABLE").unwrap_or_else(|_| DEFAULT_TABLE.to_string());
        if table.trim().is_empty() {
            return Err(StoreError::Config("SEED_TABLE is empty".to_string()));
        }

        let endpoint_url = std::env::var("SEED_ENDPOINT_URL")
            .ok()
            .filter(|url| !url.trim().is_empty());

        Ok(Self {
            table,
            endpoint_url,
        })
    }
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TABLE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder() {
        let config = StoreConfig::new("exam_registry_dev").with_endpoint_url("http://localhost:8000");
        assert_eq!(config.table, "exam_registry_dev");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://localhost:8000"));
    }
}
