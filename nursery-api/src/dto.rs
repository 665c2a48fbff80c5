//! Data Transfer Objects for API requests and responses

use nursery_core::Category;
use nursery_db::PlantQuery;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_secs: u64,
}

/// Readiness response
#[derive(Debug, Serialize, Deserialize)]
pub struct ReadyResponse {
    pub status: String,
    pub backend: String,
}

/// Raw `/api/plants` query string; parsed so bad values map to field errors
#[derive(Debug, Default, Deserialize)]
pub struct ListPlantsParams {
    pub featured: Option<String>,
    pub category: Option<String>,
    pub query: Option<String>,
    pub limit: Option<String>,
}

impl ListPlantsParams {
    pub fn into_query(self) -> Result<PlantQuery, ApiError> {
        let featured = match self.featured.as_deref().map(str::trim) {
            None | Some("") => None,
            Some("true") | Some("1") => Some(true),
            Some("false") | Some("0") => Some(false),
            Some(_) => {
                return Err(ApiError::bad_request(
                    "featured",
                    "must be one of true, false, 1, 0",
                ))
            }
        };

        let limit = match self.limit.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(raw.parse::<usize>().map_err(|_| {
                ApiError::bad_request("limit", "must be a non-negative integer")
            })?),
        };

        Ok(PlantQuery {
            featured,
            category: non_blank(self.category),
            text: non_blank(self.query),
            limit,
        })
    }
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

/// Delete response
#[derive(Debug, Serialize, Deserialize)]
pub struct DeleteResponse {
    pub success: bool,
}

/// Category creation response
#[derive(Debug, Serialize, Deserialize)]
pub struct CategoryCreatedResponse {
    pub message: String,
    pub category: Category,
}

/// Direct-upload parameters for the admin image widget
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UploadConfigResponse {
    pub upload_url: Option<String>,
    pub cloud_name: Option<String>,
    pub upload_preset: String,
}
