//! Plant catalog endpoints

use axum::{
    extract::{
        rejection::{JsonRejection, QueryRejection},
        Path, Query, State,
    },
    http::StatusCode,
    Json,
};
use nursery_core::Plant;
use nursery_db::PlantPage;
use serde_json::Value;

use crate::auth::AdminActor;
use crate::dto::{DeleteResponse, ListPlantsParams};
use crate::error::ApiResult;
use crate::metrics::record_write;
use crate::state::AppState;

/// List plants, newest first
pub async fn list_plants(
    State(state): State<AppState>,
    params: Result<Query<ListPlantsParams>, QueryRejection>,
) -> ApiResult<Json<PlantPage>> {
    let Query(params) = params?;
    let query = params.into_query()?;
    let page = state.plants.list(&query).await?;
    Ok(Json(page))
}

/// Get plant by ID
pub async fn get_plant(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Json<Plant>> {
    Ok(Json(state.plants.get(&id).await?))
}

/// Create a plant
pub async fn create_plant(
    State(state): State<AppState>,
    actor: AdminActor,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<Plant>)> {
    let Json(payload) = payload?;
    let result = state.plants.create(actor.id(), &payload).await;
    record_write("plant.create", result.is_ok());

    Ok((StatusCode::CREATED, Json(result?)))
}

/// Update a plant
pub async fn update_plant(
    State(state): State<AppState>,
    actor: AdminActor,
    Path(id): Path<String>,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<Json<Plant>> {
    let Json(payload) = payload?;
    let result = state.plants.update(actor.id(), &id, &payload).await;
    record_write("plant.update", result.is_ok());

    Ok(Json(result?))
}

/// Delete a plant
pub async fn delete_plant(
    State(state): State<AppState>,
    actor: AdminActor,
    Path(id): Path<String>,
) -> ApiResult<Json<DeleteResponse>> {
    let result = state.plants.delete(actor.id(), &id).await;
    record_write("plant.delete", result.is_ok());

    result?;
    Ok(Json(DeleteResponse { success: true }))
}
