//! User listing route

use axum::{Json, Router, extract::State, routing::get};

use crate::error::ApiError;
use crate::state::AppState;

use super::types::UserSummary;

/// GET /api/getUsers
async fn list_users(State(state): State<AppState>) -> Result<Json<Vec<UserSummary>>, ApiError> {
    let users = state.db.list_users().await?;

    Ok(Json(
        users
            .into_iter()
            .map(|u| UserSummary {
                id: u.id,
                name: u.name,
            })
            .collect(),
    ))
}

/// Create user routes
pub fn routes() -> Router<AppState> {
    Router::new().route("/api/getUsers", get(list_users))
}
