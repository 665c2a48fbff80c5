//! Catalog repositories
//!
//! Typed access to the `plants` and `categories` collections on top of the
//! document-store gateway.

mod category_repo;
mod plant_repo;

pub use category_repo::*;
pub use plant_repo::*;

use crate::error::DbResult;
use crate::store::DocumentStore;
use std::sync::Arc;

/// Catalog database - main entry point for storage operations
pub struct NurseryDatabase {
    store: Arc<dyn DocumentStore>,
    pub plants: PlantRepo,
    pub categories: CategoryRepo,
}

impl NurseryDatabase {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            store: store.clone(),
            plants: PlantRepo::new(store.clone()),
            categories: CategoryRepo::new(store),
        }
    }

    /// Get the underlying store
    pub fn store(&self) -> &Arc<dyn DocumentStore> {
        &self.store
    }

    /// Create tables and indexes
    pub async fn init_schema(&self) -> DbResult<()> {
        self.store.init_schema().await
    }

    /// Check store reachability
    pub async fn health_check(&self) -> DbResult<bool> {
        self.store.ping().await.map(|_| true)
    }
}
