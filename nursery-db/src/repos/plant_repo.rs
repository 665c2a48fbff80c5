//! Plant repository implementation

use nursery_core::{Plant, RecordKey};
use serde_json::Value;
use std::sync::Arc;

use crate::entities::Entity;
use crate::error::DbResult;
use crate::store::{Collection, Document, DocumentFilter, DocumentStore, SortSpec};

/// Listing order: newest first
pub const PLANT_SORT_FIELD: &str = "createdAt";

pub struct PlantRepo {
    collection: Collection,
}

impl PlantRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: Collection::new(store, Plant::COLLECTION),
        }
    }

    /// Plants matching `filter`, newest first
    pub async fn list(&self, filter: &DocumentFilter, limit: Option<usize>) -> DbResult<Vec<Plant>> {
        let sort = SortSpec::desc(PLANT_SORT_FIELD);
        self.collection
            .find_many(filter, Some(&sort), limit)
            .await?
            .into_iter()
            .map(Plant::from_document)
            .collect()
    }

    pub async fn count(&self, filter: &DocumentFilter) -> DbResult<u64> {
        self.collection.count(filter).await
    }

    pub async fn get(&self, key: &RecordKey) -> DbResult<Option<Plant>> {
        self.collection
            .find_one(key)
            .await?
            .map(Plant::from_document)
            .transpose()
    }

    pub async fn insert(&self, plant: &Plant) -> DbResult<()> {
        self.collection
            .insert_one(plant.key(), plant.to_document()?)
            .await
    }

    /// Persist the difference between `before` and `after`.
    ///
    /// Returns the stored result, or `None` if the record vanished meanwhile.
    pub async fn update(&self, before: &Plant, after: &Plant) -> DbResult<Option<Plant>> {
        let patch = document_patch(&before.to_document()?, &after.to_document()?);
        self.collection
            .update_one(before.key(), patch)
            .await?
            .map(Plant::from_document)
            .transpose()
    }

    pub async fn delete(&self, key: &RecordKey) -> DbResult<bool> {
        self.collection.delete_one(key).await
    }
}

/// Shallow patch turning `before` into `after`; dropped fields become `null`
pub(crate) fn document_patch(before: &Document, after: &Document) -> Document {
    let mut patch: Document = after
        .iter()
        .filter(|(field, value)| before.get(*field) != Some(*value))
        .map(|(field, value)| (field.clone(), value.clone()))
        .collect();

    for field in before.keys() {
        if !after.contains_key(field) {
            patch.insert(field.clone(), Value::Null);
        }
    }
    patch
}
