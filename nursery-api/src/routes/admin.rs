//! Admin dashboard endpoints

use axum::{extract::State, Json};
use nursery_db::DashboardStats;

use crate::auth::AdminActor;
use crate::error::ApiResult;
use crate::state::AppState;

/// Catalog totals and the newest plants
pub async fn dashboard_stats(
    State(state): State<AppState>,
    _actor: AdminActor,
) -> ApiResult<Json<DashboardStats>> {
    Ok(Json(state.dashboard.stats().await?))
}
