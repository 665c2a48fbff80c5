//! Image upload parameters
//!
//! Image bytes never pass through the API: the admin client uploads straight
//! to the image host and embeds the returned `url` / `publicId` in the plant.

use axum::{extract::State, Json};

use crate::auth::AdminActor;
use crate::dto::UploadConfigResponse;
use crate::state::AppState;

pub async fn upload_config(
    State(state): State<AppState>,
    _actor: AdminActor,
) -> Json<UploadConfigResponse> {
    let host = &state.image_host;
    Json(UploadConfigResponse {
        upload_url: host.upload_url(),
        cloud_name: host.cloud_name.clone(),
        upload_preset: host.upload_preset.clone(),
    })
}
