//! Category repository implementation

use nursery_core::Category;
use std::sync::Arc;

use crate::entities::{CategoryEntity, Entity};
use crate::error::DbResult;
use crate::store::{Collection, DocumentFilter, DocumentStore, SortSpec};

pub struct CategoryRepo {
    collection: Collection,
}

impl CategoryRepo {
    pub fn new(store: Arc<dyn DocumentStore>) -> Self {
        Self {
            collection: Collection::new(store, CategoryEntity::COLLECTION),
        }
    }

    /// All categories ordered by name
    pub async fn list(&self) -> DbResult<Vec<Category>> {
        let sort = SortSpec::asc("name");
        self.collection
            .find_many(&DocumentFilter::new(), Some(&sort), None)
            .await?
            .into_iter()
            .map(|doc| CategoryEntity::from_document(doc).map(CategoryEntity::into_category))
            .collect()
    }

    /// Canonical names of all categories
    pub async fn names(&self) -> DbResult<Vec<String>> {
        Ok(self.list().await?.into_iter().map(|c| c.name).collect())
    }

    pub async fn count(&self) -> DbResult<u64> {
        self.collection.count(&DocumentFilter::new()).await
    }

    /// Lookup ignoring case
    pub async fn find_by_name(&self, name: &str) -> DbResult<Option<Category>> {
        let filter = DocumentFilter::new().eq("nameKey", Category::name_key(name));
        let mut found = self.collection.find_many(&filter, None, Some(1)).await?;
        found
            .pop()
            .map(|doc| CategoryEntity::from_document(doc).map(CategoryEntity::into_category))
            .transpose()
    }

    pub async fn insert(&self, entity: &CategoryEntity) -> DbResult<()> {
        self.collection
            .insert_one(entity.key(), entity.to_document()?)
            .await
    }
}
