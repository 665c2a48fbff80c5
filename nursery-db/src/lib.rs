//! Nursery Database Layer
//!
//! Persistence gateway and catalog services for the plant nursery.
//!
//! # Layout
//!
//! - `store` - the `DocumentStore` gateway trait, collection handle and the
//!   memory / SurrealDB backends
//! - `entities` - how catalog records map onto stored documents
//! - `repos` - typed repositories over the `plants` and `categories` collections
//! - `services` - catalog operations (list/get/create/update/delete, categories,
//!   dashboard) returning the `CatalogError` taxonomy
//!
//! # Example
//!
//! ```ignore
//! use nursery_db::{open_store, NurseryDatabase, StoreConfig};
//! use std::sync::Arc;
//!
//! async fn example() {
//!     let store = open_store(&StoreConfig::default()).await.unwrap();
//!     let db = Arc::new(NurseryDatabase::new(store));
//!     db.init_schema().await.unwrap();
//! }
//! ```

pub mod config;
pub mod entities;
pub mod error;
pub mod repos;
pub mod schema;
pub mod services;
pub mod store;

pub use config::StoreConfig;
pub use entities::{CategoryEntity, Entity};
pub use error::{DbResult, NurseryDbError};
pub use repos::{CategoryRepo, NurseryDatabase, PlantRepo};
pub use schema::NURSERY_SCHEMA;
pub use services::{
    CatalogConfig, CategoryService, DashboardService, DashboardStats, PlantPage, PlantQuery,
    PlantService, PlantSummary,
};
pub use store::{
    Collection, Document, DocumentFilter, DocumentStore, FilterClause, MemoryStore, SortDirection,
    SortSpec, SurrealStore,
};

use std::sync::Arc;

/// Endpoint prefix selecting the in-process memory backend
pub const MEMORY_ENDPOINT: &str = "memory://";

/// Open the store named by `config.endpoint`.
///
/// `memory://` selects [`MemoryStore`]; every other endpoint is handed to
/// SurrealDB (`mem://`, `rocksdb://path`, `ws://host:port`, ...).
pub async fn open_store(config: &StoreConfig) -> DbResult<Arc<dyn DocumentStore>> {
    if config.endpoint.starts_with(MEMORY_ENDPOINT) {
        tracing::info!(backend = "memory", "Opening document store");
        return Ok(Arc::new(MemoryStore::new()));
    }

    tracing::info!(
        backend = "surrealdb",
        endpoint = %config.endpoint,
        namespace = %config.namespace,
        database = %config.database,
        "Opening document store"
    );
    Ok(Arc::new(SurrealStore::connect(config).await?))
}
