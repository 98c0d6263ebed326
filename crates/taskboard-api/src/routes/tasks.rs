//! Task routes

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{delete, get, post, put},
};
use taskboard_db::{NewTask, UpdateTask};
use tracing::{debug, info};

use crate::error::ApiError;
use crate::state::AppState;

use super::extract::{ApiJson, ApiPath};
use super::types::{CreateTaskRequest, MessageResponse, TaskResponse, UpdateTaskRequest};
use super::validation::{required, required_string};

/// POST /api/addTasks
async fn create_task(
    State(state): State<AppState>,
    ApiJson(request): ApiJson<CreateTaskRequest>,
) -> Result<(StatusCode, Json<TaskResponse>), ApiError> {
    let task = NewTask {
        project_id: required(request.project, "project")?,
        task_name: required_string(request.task_name, "taskName")?,
        status: required_string(request.status, "status")?,
        task_details: required_string(request.task_details, "taskDetails")?,
        remark: required_string(request.remark, "remark")?,
    };

    let task = state.db.insert_task(task).await?;

    info!("Created task {} in project {}", task.id, task.project_id);

    Ok((StatusCode::CREATED, Json(task.into())))
}

/// GET /api/getTasks/{project_id}
async fn list_tasks(
    State(state): State<AppState>,
    ApiPath(project_id): ApiPath<i64>,
) -> Result<Json<Vec<TaskResponse>>, ApiError> {
    let tasks = state.db.list_tasks_by_project(project_id).await?;

    Ok(Json(tasks.into_iter().map(TaskResponse::from).collect()))
}

/// PUT /api/updateTask/{id}
async fn update_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
    ApiJson(request): ApiJson<UpdateTaskRequest>,
) -> Result<Json<TaskResponse>, ApiError> {
    debug!("Updating task: {}", id);

    let update = UpdateTask {
        project_id: request.project,
        task_name: request.task_name,
        status: request.status,
        task_details: request.task_details,
        remark: request.remark,
    };

    let task = state
        .db
        .update_task(id, update)
        .await?
        .ok_or_else(|| ApiError::NotFound(format!("Task not found: {}", id)))?;

    info!("Updated task: {}", task.id);

    Ok(Json(task.into()))
}

/// DELETE /api/deleteTask/{id}
async fn delete_task(
    State(state): State<AppState>,
    ApiPath(id): ApiPath<i64>,
) -> Result<Json<MessageResponse>, ApiError> {
    debug!("Deleting task: {}", id);

    if state.db.delete_task(id).await? {
        info!("Deleted task: {}", id);
        Ok(Json(MessageResponse::new("Task deleted successfully")))
    } else {
        Err(ApiError::NotFound(format!("Task not found: {}", id)))
    }
}

/// Create task routes
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/api/addTasks", post(create_task))
        .route("/api/getTasks/{project_id}", get(list_tasks))
        .route("/api/updateTask/{id}", put(update_task))
        .route("/api/deleteTask/{id}", delete(delete_task))
}
