//! Admin dashboard statistics

use chrono::{DateTime, Utc};
use nursery_core::{CatalogResult, Plant, RecordKey};
use serde::Serialize;
use std::sync::Arc;

use crate::repos::NurseryDatabase;
use crate::store::DocumentFilter;

/// Plants shown in the "recently added" panel
pub const RECENT_PLANTS: usize = 5;

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantSummary {
    pub id: RecordKey,
    pub name: String,
    pub featured: bool,
    #[serde(with = "nursery_core::timestamp")]
    pub created_at: DateTime<Utc>,
}

impl From<Plant> for PlantSummary {
    fn from(plant: Plant) -> Self {
        Self {
            id: plant.id,
            name: plant.name,
            featured: plant.featured,
            created_at: plant.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub total_plants: u64,
    pub featured_plants: u64,
    pub total_categories: u64,
    pub recent_plants: Vec<PlantSummary>,
}

pub struct DashboardService {
    database: Arc<NurseryDatabase>,
}

impl DashboardService {
    pub fn new(database: Arc<NurseryDatabase>) -> Self {
        Self { database }
    }

    pub async fn stats(&self) -> CatalogResult<DashboardStats> {
        let plants = &self.database.plants;
        let all = DocumentFilter::new();

        let total_plants = plants.count(&all).await?;
        let featured_plants = plants
            .count(&DocumentFilter::new().eq("featured", true))
            .await?;
        let total_categories = self.database.categories.count().await?;
        let recent_plants = plants
            .list(&all, Some(RECENT_PLANTS))
            .await?
            .into_iter()
            .map(PlantSummary::from)
            .collect();

        Ok(DashboardStats {
            total_plants,
            featured_plants,
            total_categories,
            recent_plants,
        })
    }
}
