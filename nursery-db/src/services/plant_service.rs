//! Plant catalog service

use nursery_core::{
    timestamp, ActorId, CatalogError, CatalogResult, Plant, PlantValidator, RecordKey,
};
use serde::Serialize;
use serde_json::Value;
use std::sync::Arc;

use crate::repos::NurseryDatabase;
use crate::store::DocumentFilter;

use super::CatalogConfig;

/// Fields searched by the free-text `query` filter
pub const SEARCH_FIELDS: [&str; 3] = ["name", "description", "scientificName"];

/// Listing filters; all present filters must hold
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantQuery {
    pub featured: Option<bool>,
    pub category: Option<String>,
    pub text: Option<String>,
    pub limit: Option<usize>,
}

impl PlantQuery {
    pub fn to_filter(&self) -> DocumentFilter {
        let mut filter = DocumentFilter::new();
        if let Some(featured) = self.featured {
            filter = filter.eq("featured", featured);
        }
        if let Some(category) = self
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
        {
            filter = filter.contains("categories", category);
        }
        if let Some(text) = self.text.as_deref().map(str::trim).filter(|t| !t.is_empty()) {
            filter = filter.text_search(SEARCH_FIELDS, text);
        }
        filter
    }
}

/// One page of a listing plus the unlimited match count
#[derive(Debug, Clone, Serialize)]
pub struct PlantPage {
    pub plants: Vec<Plant>,
    pub total: u64,
}

/// Plant catalog service
pub struct PlantService {
    database: Arc<NurseryDatabase>,
    validator: PlantValidator,
    config: CatalogConfig,
}

impl PlantService {
    pub fn new(database: Arc<NurseryDatabase>, config: CatalogConfig) -> Self {
        Self {
            validator: PlantValidator::new(config.validation_policy()),
            database,
            config,
        }
    }

    /// Plants matching `query`, newest first
    pub async fn list(&self, query: &PlantQuery) -> CatalogResult<PlantPage> {
        let filter = query.to_filter();
        let plants = self.database.plants.list(&filter, query.limit).await?;
        let total = self.database.plants.count(&filter).await?;
        Ok(PlantPage { plants, total })
    }

    pub async fn get(&self, id: &str) -> CatalogResult<Plant> {
        let key = RecordKey::parse(id)?;
        self.database
            .plants
            .get(&key)
            .await?
            .ok_or_else(|| CatalogError::not_found("Plant", id))
    }

    /// Validate and store a new plant owned by `actor`
    pub async fn create(&self, actor: &ActorId, payload: &Value) -> CatalogResult<Plant> {
        let known = self.known_categories().await?;
        let draft = self.validator.validate_new(payload, known.as_deref())?;

        let plant = draft.into_plant(RecordKey::generate(), actor.clone(), timestamp::now());
        self.database.plants.insert(&plant).await?;

        tracing::info!(plant_id = %plant.id, actor = %actor, "Plant created");
        Ok(plant)
    }

    /// Apply a partial update. Identity and creation fields never change.
    pub async fn update(&self, actor: &ActorId, id: &str, payload: &Value) -> CatalogResult<Plant> {
        let key = RecordKey::parse(id)?;
        let known = self.known_categories().await?;
        let patch = self.validator.validate_patch(payload, known.as_deref())?;

        let before = self
            .database
            .plants
            .get(&key)
            .await?
            .ok_or_else(|| CatalogError::not_found("Plant", id))?;

        let mut after = before.clone();
        patch.apply(&mut after, timestamp::now());

        let stored = self
            .database
            .plants
            .update(&before, &after)
            .await?
            .ok_or_else(|| CatalogError::not_found("Plant", id))?;

        tracing::info!(plant_id = %stored.id, actor = %actor, "Plant updated");
        Ok(stored)
    }

    pub async fn delete(&self, actor: &ActorId, id: &str) -> CatalogResult<()> {
        let key = RecordKey::parse(id)?;
        if !self.database.plants.delete(&key).await? {
            return Err(CatalogError::not_found("Plant", id));
        }

        tracing::info!(plant_id = %key, actor = %actor, "Plant deleted");
        Ok(())
    }

    async fn known_categories(&self) -> CatalogResult<Option<Vec<String>>> {
        if !self.config.require_known_categories {
            return Ok(None);
        }
        Ok(Some(self.database.categories.names().await?))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_to_filter() {
        assert!(PlantQuery::default().to_filter().is_empty());

        let query = PlantQuery {
            featured: Some(true),
            category: Some("Indoor".to_string()),
            text: Some("  ".to_string()),
            limit: Some(4),
        };
        let filter = query.to_filter();
        assert_eq!(filter.clauses().len(), 2);
    }
}
