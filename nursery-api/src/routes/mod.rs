//! API route handlers

pub mod admin;
pub mod categories;
pub mod health;
pub mod plants;
pub mod uploads;

use axum::{
    middleware,
    routing::get,
    Router,
};

use crate::auth::identity_middleware;
use crate::metrics::metrics_middleware;
use crate::state::AppState;

/// Create the API router
pub fn create_router(state: AppState) -> Router {
    Router::new()
        // Health endpoints
        .route("/health", get(health::health_check))
        .route("/ready", get(health::ready_check))
        .route("/metrics", get(health::metrics))
        // Plant endpoints
        .route(
            "/api/plants",
            get(plants::list_plants).post(plants::create_plant),
        )
        .route(
            "/api/plants/:id",
            get(plants::get_plant)
                .put(plants::update_plant)
                .delete(plants::delete_plant),
        )
        // Category endpoints
        .route(
            "/api/categories",
            get(categories::list_categories).post(categories::create_category),
        )
        // Admin endpoints
        .route("/api/admin/stats", get(admin::dashboard_stats))
        .route("/api/uploads/config", get(uploads::upload_config))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            identity_middleware,
        ))
        .layer(middleware::from_fn(metrics_middleware))
        // State
        .with_state(state)
}
