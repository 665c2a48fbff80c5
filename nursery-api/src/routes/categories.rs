//! Category endpoints

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    Json,
};
use nursery_core::Category;
use serde_json::Value;

use crate::auth::AdminActor;
use crate::dto::CategoryCreatedResponse;
use crate::error::ApiResult;
use crate::metrics::record_write;
use crate::state::AppState;

/// List categories by name
pub async fn list_categories(State(state): State<AppState>) -> ApiResult<Json<Vec<Category>>> {
    Ok(Json(state.categories.list().await?))
}

/// Create a category; 409 when the name exists in any casing
pub async fn create_category(
    State(state): State<AppState>,
    actor: AdminActor,
    payload: Result<Json<Value>, JsonRejection>,
) -> ApiResult<(StatusCode, Json<CategoryCreatedResponse>)> {
    let Json(payload) = payload?;
    let result = state.categories.create(actor.id(), &payload).await;
    record_write("category.create", result.is_ok());

    Ok((
        StatusCode::CREATED,
        Json(CategoryCreatedResponse {
            message: "Category created successfully".to_string(),
            category: result?,
        }),
    ))
}
