//! Document store configuration
//!
//! Loaded from `NURSERY_DB_*` environment variables, overridable from the CLI.

use serde::{Deserialize, Serialize};

/// Connection settings for the backing document store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StoreConfig {
    /// `memory://`, `mem://`, `rocksdb://path`, `ws://host:port`, ...
    pub endpoint: String,
    pub namespace: String,
    pub database: String,
    pub username: Option<String>,
    pub password: Option<String>,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            endpoint: "mem://".to_string(),
            namespace: "nursery".to_string(),
            database: "catalog".to_string(),
            username: None,
            password: None,
        }
    }
}

impl StoreConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            endpoint: std::env::var("NURSERY_DB_URL").unwrap_or(defaults.endpoint),
            namespace: std::env::var("NURSERY_DB_NAMESPACE").unwrap_or(defaults.namespace),
            database: std::env::var("NURSERY_DB_DATABASE").unwrap_or(defaults.database),
            username: std::env::var("NURSERY_DB_USER").ok(),
            password: std::env::var("NURSERY_DB_PASSWORD").ok(),
        }
    }

    pub fn with_endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = endpoint.into();
        self
    }

    /// Root credentials, only when both halves are set
    pub fn credentials(&self) -> Option<(&str, &str)> {
        match (&self.username, &self.password) {
            (Some(user), Some(pass)) => Some((user.as_str(), pass.as_str())),
            _ => None,
        }
    }
}
