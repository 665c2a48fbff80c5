//! Nursery Catalog API Server
//!
//! REST API for the plant nursery storefront and its admin console.
//!
//! ## Endpoints
//!
//! ### Health
//! - GET /health - Liveness
//! - GET /ready - Store connectivity (503 when degraded)
//! - GET /metrics - Prometheus scrape (when enabled)
//!
//! ### Plants
//! - GET /api/plants?featured=&category=&query=&limit= - List, newest first
//! - POST /api/plants - Create (admin)
//! - GET /api/plants/:id - Get
//! - PUT /api/plants/:id - Partial update (admin)
//! - DELETE /api/plants/:id - Delete (admin)
//!
//! ### Categories
//! - GET /api/categories - List by name
//! - POST /api/categories - Create, 409 on a case-insensitive duplicate (admin)
//!
//! ### Admin
//! - GET /api/admin/stats - Dashboard totals (admin)
//! - GET /api/uploads/config - Direct image upload parameters (admin)

pub mod auth;
pub mod dto;
pub mod error;
pub mod metrics;
pub mod routes;
pub mod server;
pub mod state;

pub use auth::{
    Actor, AdminActor, AuthConfig, AuthMethod, Authenticator, IdentityProvider,
    JwtIdentityProvider, RejectedCredential, StaticTokenProvider,
};
pub use dto::*;
pub use error::*;
pub use crate::metrics::MetricsConfig;
pub use routes::create_router;
pub use server::*;
pub use state::*;
