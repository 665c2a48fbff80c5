//! Application state for the API server

use metrics_exporter_prometheus::PrometheusHandle;
use nursery_core::{ActorId, DEFAULT_CATEGORIES};
use nursery_db::{
    CatalogConfig, CategoryService, DashboardService, DocumentStore, NurseryDatabase, PlantService,
};
use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use crate::auth::{AuthConfig, Authenticator};
use crate::metrics::{init_metrics, MetricsConfig};

/// Actor recorded on categories seeded at startup
pub const SYSTEM_ACTOR: &str = "system";

/// API server state
#[derive(Clone)]
pub struct AppState {
    pub plants: Arc<PlantService>,
    pub categories: Arc<CategoryService>,
    pub dashboard: Arc<DashboardService>,
    pub database: Arc<NurseryDatabase>,
    pub auth: Arc<Authenticator>,
    pub image_host: ImageHostConfig,
    /// Present when metrics are enabled
    pub metrics: Option<PrometheusHandle>,
    pub started_at: Instant,
    /// API version
    pub version: String,
}

impl AppState {
    /// Create new app state over an opened store, bootstrapping its schema
    /// and, when configured, the default categories
    pub async fn new(
        store: Arc<dyn DocumentStore>,
        config: &ApiConfig,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let database = Arc::new(NurseryDatabase::new(store));
        database.init_schema().await?;

        let auth = Authenticator::from_config(&config.auth)?;
        let metrics = init_metrics(&config.metrics)?;

        let categories = CategoryService::new(database.clone());
        if config.catalog.seed_default_categories {
            categories
                .seed_if_empty(&ActorId::new(SYSTEM_ACTOR), DEFAULT_CATEGORIES)
                .await?;
        }

        Ok(Self {
            plants: Arc::new(PlantService::new(database.clone(), config.catalog.clone())),
            categories: Arc::new(categories),
            dashboard: Arc::new(DashboardService::new(database.clone())),
            database,
            auth: Arc::new(auth),
            image_host: config.image_host.clone(),
            metrics,
            started_at: Instant::now(),
            version: env!("CARGO_PKG_VERSION").to_string(),
        })
    }

    pub fn uptime_secs(&self) -> u64 {
        self.started_at.elapsed().as_secs()
    }
}

/// Image hosting parameters handed to the admin upload widget
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ImageHostConfig {
    pub cloud_name: Option<String>,
    pub upload_preset: String,
    /// Upload endpoint template; `{cloud}` is replaced by the cloud name
    pub upload_url_template: String,
}

impl Default for ImageHostConfig {
    fn default() -> Self {
        Self {
            cloud_name: None,
            upload_preset: "plant-nursery".to_string(),
            upload_url_template: "https://api.cloudinary.com/v1_1/{cloud}/image/upload"
                .to_string(),
        }
    }
}

impl ImageHostConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            cloud_name: std::env::var("NURSERY_CLOUD_NAME").ok(),
            upload_preset: std::env::var("NURSERY_UPLOAD_PRESET").unwrap_or(defaults.upload_preset),
            upload_url_template: std::env::var("NURSERY_UPLOAD_URL")
                .unwrap_or(defaults.upload_url_template),
        }
    }

    /// Resolved upload endpoint, once a cloud name is configured
    pub fn upload_url(&self) -> Option<String> {
        self.cloud_name
            .as_deref()
            .map(|cloud| self.upload_url_template.replace("{cloud}", cloud))
    }
}

/// API server configuration
#[derive(Debug, Clone)]
pub struct ApiConfig {
    pub host: String,
    pub port: u16,
    pub enable_cors: bool,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub catalog: CatalogConfig,
    pub auth: AuthConfig,
    pub image_host: ImageHostConfig,
    pub metrics: MetricsConfig,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 3000,
            enable_cors: true,
            request_timeout_secs: 30,
            max_body_bytes: 1024 * 1024,
            catalog: CatalogConfig::default(),
            auth: AuthConfig::default(),
            image_host: ImageHostConfig::default(),
            metrics: MetricsConfig::default(),
        }
    }
}

impl ApiConfig {
    /// Create from environment variables
    pub fn from_env() -> Self {
        let defaults = Self::default();

        Self {
            host: std::env::var("NURSERY_HOST").unwrap_or(defaults.host),
            port: env_parse("NURSERY_PORT").unwrap_or(defaults.port),
            enable_cors: std::env::var("NURSERY_ENABLE_CORS")
                .map(|v| v.to_lowercase() != "false" && v != "0")
                .unwrap_or(defaults.enable_cors),
            request_timeout_secs: env_parse("NURSERY_REQUEST_TIMEOUT_SECS")
                .unwrap_or(defaults.request_timeout_secs),
            max_body_bytes: env_parse("NURSERY_MAX_BODY_BYTES").unwrap_or(defaults.max_body_bytes),
            catalog: CatalogConfig::from_env(),
            auth: AuthConfig::from_env(),
            image_host: ImageHostConfig::from_env(),
            metrics: MetricsConfig::from_env(),
        }
    }
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    std::env::var(name).ok().and_then(|v| v.parse().ok())
}
