//! Plant record

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::ids::{ActorId, RecordKey};

/// An image already uploaded to the hosting service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PlantImage {
    pub url: String,
    pub alt: String,
    /// Storage-side identifier returned by the image host
    pub public_id: String,
}

/// Search engine metadata for the plant detail page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SeoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
}

/// A catalog entry as stored and returned to clients
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plant {
    pub id: RecordKey,
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub scientific_name: Option<String>,
    pub description: String,
    pub care_instructions: String,
    pub categories: Vec<String>,
    pub images: Vec<PlantImage>,
    #[serde(default)]
    pub featured: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub stock: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seo_metadata: Option<SeoMetadata>,
    #[serde(with = "crate::timestamp")]
    pub created_at: DateTime<Utc>,
    #[serde(with = "crate::timestamp")]
    pub updated_at: DateTime<Utc>,
    pub created_by: ActorId,
}

/// Validated client-controlled content of a new plant.
#[derive(Debug, Clone, PartialEq)]
pub struct PlantDraft {
    pub name: String,
    pub scientific_name: Option<String>,
    pub description: String,
    pub care_instructions: String,
    pub categories: Vec<String>,
    pub images: Vec<PlantImage>,
    pub featured: bool,
    pub price: Option<f64>,
    pub stock: Option<i64>,
    pub seo_metadata: Option<SeoMetadata>,
}

impl PlantDraft {
    /// Attach the server-assigned fields
    pub fn into_plant(self, id: RecordKey, created_by: ActorId, now: DateTime<Utc>) -> Plant {
        Plant {
            id,
            name: self.name,
            scientific_name: self.scientific_name,
            description: self.description,
            care_instructions: self.care_instructions,
            categories: self.categories,
            images: self.images,
            featured: self.featured,
            price: self.price,
            stock: self.stock,
            seo_metadata: self.seo_metadata,
            created_at: now,
            updated_at: now,
            created_by,
        }
    }
}

/// Validated partial update.
///
/// Required fields are plain `Option`s (absent leaves the stored value).
/// Optional fields are `Option<Option<_>>`: `Some(None)` clears the value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PlantPatch {
    pub name: Option<String>,
    pub scientific_name: Option<Option<String>>,
    pub description: Option<String>,
    pub care_instructions: Option<String>,
    pub categories: Option<Vec<String>>,
    pub images: Option<Vec<PlantImage>>,
    pub featured: Option<bool>,
    pub price: Option<Option<f64>>,
    pub stock: Option<Option<i64>>,
    pub seo_metadata: Option<Option<SeoMetadata>>,
}

impl PlantPatch {
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    /// Apply onto a stored plant, refreshing `updated_at`.
    ///
    /// `id`, `created_at` and `created_by` are never touched.
    pub fn apply(self, plant: &mut Plant, now: DateTime<Utc>) {
        if let Some(name) = self.name {
            plant.name = name;
        }
        if let Some(scientific_name) = self.scientific_name {
            plant.scientific_name = scientific_name;
        }
        if let Some(description) = self.description {
            plant.description = description;
        }
        if let Some(care_instructions) = self.care_instructions {
            plant.care_instructions = care_instructions;
        }
        if let Some(categories) = self.categories {
            plant.categories = categories;
        }
        if let Some(images) = self.images {
            plant.images = images;
        }
        if let Some(featured) = self.featured {
            plant.featured = featured;
        }
        if let Some(price) = self.price {
            plant.price = price;
        }
        if let Some(stock) = self.stock {
            plant.stock = stock;
        }
        if let Some(seo_metadata) = self.seo_metadata {
            plant.seo_metadata = seo_metadata;
        }
        // updated_at never moves behind created_at, even with a skewed clock
        plant.updated_at = now.max(plant.created_at);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_draft() -> PlantDraft {
        PlantDraft {
            name: "Monstera".to_string(),
            scientific_name: None,
            description: "Big leaves".to_string(),
            care_instructions: "Water weekly".to_string(),
            categories: vec!["Tropical".to_string()],
            images: vec![PlantImage {
                url: "https://x/img.jpg".to_string(),
                alt: "m".to_string(),
                public_id: "p1".to_string(),
            }],
            featured: false,
            price: Some(12.5),
            stock: Some(3),
            seo_metadata: None,
        }
    }

    #[test]
    fn test_into_plant_sets_server_fields() {
        let now = Utc::now();
        let id = RecordKey::generate();
        let plant = sample_draft().into_plant(id.clone(), ActorId::new("user_1"), now);

        assert_eq!(plant.id, id);
        assert_eq!(plant.created_at, now);
        assert_eq!(plant.updated_at, now);
        assert_eq!(plant.created_by.as_str(), "user_1");
    }

    #[test]
    fn test_patch_apply_keeps_identity_fields() {
        let created = Utc::now();
        let mut plant =
            sample_draft().into_plant(RecordKey::generate(), ActorId::new("user_1"), created);
        let before = plant.clone();

        let patch = PlantPatch {
            name: Some("Monstera deliciosa".to_string()),
            price: Some(None),
            featured: Some(true),
            ..Default::default()
        };
        let later = created + chrono::Duration::seconds(5);
        patch.apply(&mut plant, later);

        assert_eq!(plant.name, "Monstera deliciosa");
        assert_eq!(plant.price, None);
        assert!(plant.featured);
        assert_eq!(plant.stock, Some(3));
        assert_eq!(plant.id, before.id);
        assert_eq!(plant.created_at, before.created_at);
        assert_eq!(plant.created_by, before.created_by);
        assert_eq!(plant.updated_at, later);
    }

    #[test]
    fn test_plant_serializes_camel_case() {
        let plant = sample_draft().into_plant(
            RecordKey::generate(),
            ActorId::new("user_1"),
            crate::timestamp::now(),
        );
        let json = serde_json::to_value(&plant).unwrap();

        assert!(json.get("careInstructions").is_some());
        assert!(json.get("createdBy").is_some());
        assert_eq!(json["images"][0]["publicId"], "p1");
        assert!(json.get("scientificName").is_none());
        assert!(json["createdAt"].as_str().unwrap().ends_with('Z'));

        let back: Plant = serde_json::from_value(json).unwrap();
        assert_eq!(back, plant);
    }
}
