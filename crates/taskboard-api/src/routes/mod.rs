//! API routes

mod auth;
mod extract;
mod health;
pub mod metrics;
mod projects;
mod tasks;
pub mod types;
mod users;
mod validation;

use axum::{Router, extract::DefaultBodyLimit};
use std::sync::Arc;
use tower_http::cors::CorsLayer;

use crate::state::{AppState, MetricsHandle};

/// Largest accepted request body; every payload here is a small JSON document
const MAX_BODY_BYTES: usize = 64 * 1024;

/// Create the main router
pub fn create_router(state: AppState, metrics_handle: Option<Arc<MetricsHandle>>) -> Router {
    let mut router = Router::new()
        // Health check
        .merge(health::routes())
        // Signup, login and the protected identity route
        .merge(auth::routes(&state))
        // Resource endpoints
        .merge(users::routes())
        .merge(projects::routes())
        .merge(tasks::routes())
        .with_state(state)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES));

    if let Some(handle) = metrics_handle {
        router = router.merge(metrics::routes(handle));
    }

    // Browser clients call the API cross-origin
    router.layer(CorsLayer::permissive())
}
