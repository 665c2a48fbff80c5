//! In-memory document store
//!
//! Backs tests and `memory://` deployments. Data lives for the process only.

use std::collections::HashMap;

use async_trait::async_trait;
use nursery_core::RecordKey;
use tokio::sync::RwLock;

use super::{merge_patch, with_id, Document, DocumentFilter, DocumentStore, SortSpec};
use crate::error::{DbResult, NurseryDbError};

type CollectionMap = HashMap<RecordKey, Document>;

/// Process-local store keyed by collection name
#[derive(Default)]
pub struct MemoryStore {
    collections: RwLock<HashMap<String, CollectionMap>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl DocumentStore for MemoryStore {
    fn backend(&self) -> &'static str {
        "memory"
    }

    async fn find_many(
        &self,
        collection: &str,
        filter: &DocumentFilter,
        sort: Option<&SortSpec>,
        limit: Option<usize>,
    ) -> DbResult<Vec<Document>> {
        let collections = self.collections.read().await;
        let Some(docs) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut results: Vec<Document> = docs
            .iter()
            .filter(|(_, doc)| filter.matches(doc))
            .map(|(key, doc)| with_id(key, doc))
            .collect();

        if let Some(sort) = sort {
            results.sort_by(|a, b| sort.compare(a, b));
        }
        if let Some(limit) = limit {
            results.truncate(limit);
        }

        Ok(results)
    }

    async fn count(&self, collection: &str, filter: &DocumentFilter) -> DbResult<u64> {
        let collections = self.collections.read().await;
        let count = collections
            .get(collection)
            .map(|docs| docs.values().filter(|doc| filter.matches(doc)).count())
            .unwrap_or(0);
        Ok(count as u64)
    }

    async fn find_one(&self, collection: &str, key: &RecordKey) -> DbResult<Option<Document>> {
        let collections = self.collections.read().await;
        Ok(collections
            .get(collection)
            .and_then(|docs| docs.get(key))
            .map(|doc| with_id(key, doc)))
    }

    async fn insert_one(&self, collection: &str, key: &RecordKey, mut doc: Document) -> DbResult<()> {
        doc.remove(super::ID_FIELD);
        let mut collections = self.collections.write().await;
        let docs = collections.entry(collection.to_string()).or_default();
        if docs.contains_key(key) {
            return Err(NurseryDbError::AlreadyExists(format!("{}:{}", collection, key)));
        }
        docs.insert(key.clone(), doc);
        Ok(())
    }

    async fn update_one(
        &self,
        collection: &str,
        key: &RecordKey,
        patch: Document,
    ) -> DbResult<Option<Document>> {
        let mut collections = self.collections.write().await;
        let Some(doc) = collections
            .get_mut(collection)
            .and_then(|docs| docs.get_mut(key))
        else {
            return Ok(None);
        };

        merge_patch(doc, patch);
        Ok(Some(with_id(key, doc)))
    }

    async fn delete_one(&self, collection: &str, key: &RecordKey) -> DbResult<bool> {
        let mut collections = self.collections.write().await;
        Ok(collections
            .get_mut(collection)
            .map(|docs| docs.remove(key).is_some())
            .unwrap_or(false))
    }

    async fn ping(&self) -> DbResult<()> {
        Ok(())
    }
}
