use nursery_core::{ActorId, Category, RecordKey};
use serde::{Deserialize, Serialize};

use super::Entity;

/// Stored category: the public record plus its lowercased lookup key
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryEntity {
    #[serde(flatten)]
    pub category: Category,
    pub name_key: String,
}

impl CategoryEntity {
    pub fn new(name: String, created_by: ActorId, now: chrono::DateTime<chrono::Utc>) -> Self {
        let name_key = Category::name_key(&name);
        Self {
            category: Category {
                id: RecordKey::generate(),
                name,
                created_at: now,
                updated_at: now,
                created_by,
            },
            name_key,
        }
    }

    pub fn into_category(self) -> Category {
        self.category
    }
}

impl Entity for CategoryEntity {
    const COLLECTION: &'static str = "categories";

    fn key(&self) -> &RecordKey {
        &self.category.id
    }
}
