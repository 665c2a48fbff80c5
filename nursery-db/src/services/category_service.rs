//! Category service
//!
//! Category names are unique ignoring case. Creation holds a process-wide
//! lock across the existence check and the insert, so two concurrent creates
//! of the same name cannot both succeed.

use nursery_core::validation::validate_category_name;
use nursery_core::{timestamp, ActorId, CatalogError, CatalogResult, Category};
use serde_json::Value;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::entities::CategoryEntity;
use crate::repos::NurseryDatabase;

pub struct CategoryService {
    database: Arc<NurseryDatabase>,
    create_lock: Mutex<()>,
}

impl CategoryService {
    pub fn new(database: Arc<NurseryDatabase>) -> Self {
        Self {
            database,
            create_lock: Mutex::new(()),
        }
    }

    /// All categories ordered by name
    pub async fn list(&self) -> CatalogResult<Vec<Category>> {
        Ok(self.database.categories.list().await?)
    }

    /// Validate and create a category from a request payload
    pub async fn create(&self, actor: &ActorId, payload: &Value) -> CatalogResult<Category> {
        let name = validate_category_name(payload)?;
        self.create_named(actor, name).await
    }

    /// Create a category; `Conflict` if the name exists in any casing
    pub async fn create_named(&self, actor: &ActorId, name: String) -> CatalogResult<Category> {
        let _guard = self.create_lock.lock().await;

        if let Some(existing) = self.database.categories.find_by_name(&name).await? {
            return Err(CatalogError::conflict(format!(
                "Category already exists: {}",
                existing.name
            )));
        }

        let entity = CategoryEntity::new(name, actor.clone(), timestamp::now());
        self.database.categories.insert(&entity).await?;

        let category = entity.into_category();
        tracing::info!(
            category_id = %category.id,
            name = %category.name,
            actor = %actor,
            "Category created"
        );
        Ok(category)
    }

    /// Seed `names` only into an empty category collection
    pub async fn seed_if_empty(
        &self,
        actor: &ActorId,
        names: &[&str],
    ) -> CatalogResult<Vec<Category>> {
        if self.database.categories.count().await? > 0 {
            return Ok(Vec::new());
        }
        let created = self.seed(actor, names).await?;
        tracing::info!(count = created.len(), "Default categories seeded");
        Ok(created)
    }

    /// Create each missing name; returns only the categories created
    pub async fn seed(&self, actor: &ActorId, names: &[&str]) -> CatalogResult<Vec<Category>> {
        let mut created = Vec::new();
        for name in names {
            match self.create_named(actor, name.trim().to_string()).await {
                Ok(category) => created.push(category),
                Err(CatalogError::Conflict(_)) => {
                    tracing::debug!(name = %name, "Category already present, skipping");
                }
                Err(e) => return Err(e),
            }
        }
        Ok(created)
    }
}
