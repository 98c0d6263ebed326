//! Application state

use axum::extract::FromRef;
use std::sync::Arc;
use taskboard_auth::TokenManager;
use taskboard_db::Database;

pub use metrics_exporter_prometheus::PrometheusHandle as MetricsHandle;

/// Application state shared across handlers
///
/// Built once at startup and read-only afterwards.
#[derive(Clone)]
pub struct AppState {
    pub db: Database,
    pub tokens: Arc<TokenManager>,
}

impl AppState {
    pub fn new(db: Database, tokens: Arc<TokenManager>) -> Self {
        Self { db, tokens }
    }
}

impl FromRef<AppState> for Arc<TokenManager> {
    fn from_ref(state: &AppState) -> Self {
        state.tokens.clone()
    }
}
