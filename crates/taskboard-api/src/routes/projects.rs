//! Project routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};
use taskboard_db::NewProject;
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

use super::extract::ApiJson;
use super::types::{CreateProjectRequest, ProjectListItem, ProjectResponse};
use super::validation::{parse_date, required, required_string};

/// POST /api/addProject
async fn create_project(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateProjectRequest>,
) -> Result<(StatusCode, Json<ProjectResponse>), ApiError> {
    let project_name = required_string(request.project_name, "projectName")?;
    let user_id = required(request.user, "user")?;
    let created_date = required_string(request.created_date, "createdDate")?;
    let priority = required_string(request.priority, "priority")?;
    let created_date = parse_date(&created_date, "createdDate")?;

    let project = state
        .db
        .insert_project(NewProject {
            project_name,
            user_id,
            created_date,
            priority,
        })
        .await?;

    info!("Created project {} for user {}", project.id, project.user_id);

    Ok((StatusCode::CREATED, Json(project.into())))
}

/// GET /api/getProjects
async fn list_projects(
    State(state): State<AppState>,
) -> Result<Json<Vec<ProjectListItem>>, ApiError> {
    let projects = state.db.list_projects_with_owner().await?;

    Ok(Json(projects.into_iter().map(ProjectListItem::from).collect()))
}

/// Create project routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/addProject", post(create_project))
        .route("/api/getProjects", get(list_projects))
}
