//! Catalog service implementations
//!
//! Operations the API exposes, built on the repositories. Every method
//! returns the `CatalogError` taxonomy; storage failures surface as
//! `StorageUnavailable`.

pub mod category_service;
pub mod dashboard_service;
pub mod plant_service;

pub use category_service::CategoryService;
pub use dashboard_service::{DashboardService, DashboardStats, PlantSummary};
pub use plant_service::{PlantPage, PlantQuery, PlantService};

use nursery_core::ValidationPolicy;
use serde::{Deserialize, Serialize};

/// Catalog rules shared by the services
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// Reject plant category tags that are not managed categories
    pub require_known_categories: bool,
    /// Hosts image URLs may point at; empty allows any
    pub allowed_image_hosts: Vec<String>,
    /// Insert the default category list at startup when no category exists
    pub seed_default_categories: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            require_known_categories: true,
            allowed_image_hosts: Vec::new(),
            seed_default_categories: true,
        }
    }
}

impl CatalogConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let require_known_categories = env_flag("NURSERY_REQUIRE_KNOWN_CATEGORIES", true);
        let seed_default_categories = env_flag("NURSERY_SEED_CATEGORIES", true);

        let allowed_image_hosts = std::env::var("NURSERY_ALLOWED_IMAGE_HOSTS")
            .map(|v| {
                v.split(',')
                    .map(|h| h.trim().to_lowercase())
                    .filter(|h| !h.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Self {
            require_known_categories,
            allowed_image_hosts,
            seed_default_categories,
        }
    }

    /// Free-form categories, any image host, nothing seeded
    pub fn permissive() -> Self {
        Self {
            require_known_categories: false,
            allowed_image_hosts: Vec::new(),
            seed_default_categories: false,
        }
    }

    /// Known categories enforced against an initially empty category list
    pub fn unseeded() -> Self {
        Self {
            seed_default_categories: false,
            ..Self::default()
        }
    }

    pub fn validation_policy(&self) -> ValidationPolicy {
        ValidationPolicy {
            allowed_image_hosts: self.allowed_image_hosts.clone(),
        }
    }
}

fn env_flag(name: &str, default: bool) -> bool {
    std::env::var(name)
        .map(|v| !matches!(v.to_lowercase().as_str(), "false" | "0" | "no"))
        .unwrap_or(default)
}
