//! Request/Response DTOs
//!
//! Request fields are optional so that a missing field surfaces as a
//! validation error naming it, instead of a deserialization rejection.

use serde::{Deserialize, Serialize};
use taskboard_auth::AuthUser;
use taskboard_db::{Project, ProjectWithOwner, Task, User, UserRole};

/// Generic message response
#[derive(Serialize)]
pub struct MessageResponse {
    pub message: String,
}

impl MessageResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

// ==================== Auth Types ====================

/// Signup request
#[derive(Deserialize, Default)]
pub struct SignupRequest {
    pub name: Option<String>,
    pub email: Option<String>,
    pub password: Option<String>,
    pub role: Option<String>,
}

/// Login request
#[derive(Deserialize, Default)]
pub struct LoginRequest {
    pub email: Option<String>,
    pub password: Option<String>,
}

/// Public projection of a user; never carries the password hash
#[derive(Serialize)]
pub struct UserProfile {
    pub id: i64,
    pub name: String,
    pub email: String,
    pub role: UserRole,
}

impl From<User> for UserProfile {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            role: user.role,
        }
    }
}

/// Login response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginResponse {
    pub token: String,
    pub expires_in: i64,
    pub user: UserProfile,
}

/// Protected endpoint response
#[derive(Serialize)]
pub struct ProtectedResponse {
    pub message: String,
    pub user: AuthUser,
}

// ==================== User Types ====================

/// User listing entry
#[derive(Serialize)]
pub struct UserSummary {
    pub id: i64,
    pub name: String,
}

// ==================== Project Types ====================

/// Create project request
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateProjectRequest {
    pub project_name: Option<String>,
    pub user: Option<i64>,
    pub created_date: Option<String>,
    pub priority: Option<String>,
}

/// Project response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectResponse {
    pub id: i64,
    pub project_name: String,
    pub user: i64,
    pub created_date: String,
    pub priority: String,
    pub created_at: String,
}

impl From<Project> for ProjectResponse {
    fn from(project: Project) -> Self {
        Self {
            id: project.id,
            project_name: project.project_name,
            user: project.user_id,
            created_date: project.created_date.to_rfc3339(),
            priority: project.priority,
            created_at: project.created_at.to_rfc3339(),
        }
    }
}

/// Project owner reference with the name resolved
#[derive(Serialize)]
pub struct ProjectOwner {
    pub id: i64,
    pub name: String,
}

/// Project listing entry; `user` is null when the owner no longer exists
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProjectListItem {
    pub id: i64,
    pub project_name: String,
    pub user: Option<ProjectOwner>,
    pub created_date: String,
    pub priority: String,
    pub created_at: String,
}

impl From<ProjectWithOwner> for ProjectListItem {
    fn from(entry: ProjectWithOwner) -> Self {
        let ProjectWithOwner { project, owner_name } = entry;
        Self {
            id: project.id,
            project_name: project.project_name,
            user: owner_name.map(|name| ProjectOwner {
                id: project.user_id,
                name,
            }),
            created_date: project.created_date.to_rfc3339(),
            priority: project.priority,
            created_at: project.created_at.to_rfc3339(),
        }
    }
}

// ==================== Task Types ====================

/// Create task request
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct CreateTaskRequest {
    pub project: Option<i64>,
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub task_details: Option<String>,
    pub remark: Option<String>,
}

/// Update task request (partial)
#[derive(Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct UpdateTaskRequest {
    pub project: Option<i64>,
    pub task_name: Option<String>,
    pub status: Option<String>,
    pub task_details: Option<String>,
    pub remark: Option<String>,
}

/// Task response
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponse {
    pub id: i64,
    pub project: i64,
    pub task_name: String,
    pub status: String,
    pub task_details: String,
    pub remark: String,
    pub created_at: String,
    pub updated_at: String,
}

impl From<Task> for TaskResponse {
    fn from(task: Task) -> Self {
        Self {
            id: task.id,
            project: task.project_id,
            task_name: task.task_name,
            status: task.status,
            task_details: task.task_details,
            remark: task.remark,
            created_at: task.created_at.to_rfc3339(),
            updated_at: task.updated_at.to_rfc3339(),
        }
    }
}
